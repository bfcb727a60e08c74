//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! This module provides concrete implementations of the repository traits
//! defined in the domain layer. Each repository handles data access for
//! a specific entity type.
//!
//! ## Available Repositories
//!
//! - **UserRepository** - User accounts and admin listing
//! - **SessionRepository** - Opaque-token browser sessions
//! - **CategoryRepository / ZoneRepository** - Catalog rows
//! - **ListingRepository** - Classified ads with filtered search
//! - **TenantRepository** - Real-estate agency namespaces
//! - **PropertyRepository** - Tenant-owned property publications
//! - **RestaurantRepository / MenuItemRepository** - Restaurants and menus
//! - **PlanRepository / SubscriptionRepository** - Plan catalog and
//!   subscriptions (the subscribe flow runs in a transaction)
//! - **PaymentRepository** - Manually confirmed payments
//! - **LeadRepository** - Property inquiries
//! - **MessageRepository** - Listing-scoped chat

pub mod category_repository;
pub mod lead_repository;
pub mod listing_repository;
pub mod menu_item_repository;
pub mod message_repository;
pub mod payment_repository;
pub mod plan_repository;
pub mod property_repository;
pub mod restaurant_repository;
pub mod session_repository;
pub mod subscription_repository;
pub mod tenant_repository;
pub mod user_repository;
pub mod zone_repository;

pub use category_repository::PgCategoryRepository;
pub use lead_repository::PgLeadRepository;
pub use listing_repository::PgListingRepository;
pub use menu_item_repository::PgMenuItemRepository;
pub use message_repository::PgMessageRepository;
pub use payment_repository::PgPaymentRepository;
pub use plan_repository::PgPlanRepository;
pub use property_repository::PgPropertyRepository;
pub use restaurant_repository::PgRestaurantRepository;
pub use session_repository::PgSessionRepository;
pub use subscription_repository::PgSubscriptionRepository;
pub use tenant_repository::PgTenantRepository;
pub use user_repository::PgUserRepository;
pub use zone_repository::PgZoneRepository;
