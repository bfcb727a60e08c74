//! Bulk Import Handler
//!
//! Accepts rows parsed from the CSV/XLSX template and feeds them through
//! the import normalization service.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::application::dto::request::ImportListingsRequest;
use crate::application::dto::response::ImportReportResponse;
use crate::application::services::{
    ImportError, ImportService, ImportServiceImpl, SubscriptionService,
};
use crate::domain::{PublicationType, UNLIMITED};
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{
    PgCategoryRepository, PgListingRepository, PgZoneRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Build the import service from application state.
fn import_service(
    state: &AppState,
) -> ImportServiceImpl<PgCategoryRepository, PgZoneRepository, PgListingRepository> {
    ImportServiceImpl::new(
        Arc::new(PgCategoryRepository::new(state.db.clone())),
        Arc::new(PgZoneRepository::new(state.db.clone())),
        Arc::new(PgListingRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

/// Import listings in bulk (`POST /api/import/listings`)
pub async fn import_listings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ImportListingsRequest>,
) -> Result<Json<ImportReportResponse>, AppError> {
    if body.rows.is_empty() {
        return Err(AppError::BadRequest("no rows to import".into()));
    }
    if body.rows.len() > state.settings.import.max_rows {
        return Err(AppError::BadRequest(format!(
            "too many rows: {} (max {})",
            body.rows.len(),
            state.settings.import.max_rows
        )));
    }

    let check = super::subscription::subscription_service(&state)
        .check_publication_limit(auth.id(), PublicationType::Listing)
        .await
        .map_err(super::subscription::map_subscription_error)?;

    if let Some(reason) = check.reason {
        return Err(AppError::Forbidden(reason.to_string()));
    }

    let remaining_slots = if check.limit == UNLIMITED {
        None
    } else {
        Some((check.limit as i64 - check.current).max(0))
    };

    let report = import_service(&state)
        .import_rows(auth.id(), body.rows, remaining_slots)
        .await
        .map_err(|ImportError::Internal(msg)| AppError::Internal(msg))?;

    metrics::record_import_rows(report.imported as u64, report.skipped as u64);

    tracing::info!(
        user_id = auth.id(),
        imported = report.imported,
        skipped = report.skipped,
        "bulk import finished"
    );

    Ok(Json(report.into()))
}
