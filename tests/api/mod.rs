//! REST API endpoint tests.

mod auth_tests;
mod health_tests;
mod import_tests;
mod listing_tests;
