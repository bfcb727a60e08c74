//! Catalog Handlers
//!
//! Public zone and category listings used by search filters and the
//! publish forms.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::application::dto::response::{CategoryResponse, TenantResponse, ZoneResponse};
use crate::domain::{CategoryRepository, TenantRepository, ZoneRepository};
use crate::infrastructure::repositories::{
    PgCategoryRepository, PgTenantRepository, PgZoneRepository,
};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List all zones (`GET /api/zones`)
pub async fn list_zones(
    State(state): State<AppState>,
) -> Result<Json<Vec<ZoneResponse>>, AppError> {
    let zones = PgZoneRepository::new(state.db.clone()).list_all().await?;
    Ok(Json(zones.into_iter().map(Into::into).collect()))
}

/// List all categories (`GET /api/categories`)
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = PgCategoryRepository::new(state.db.clone())
        .list_all()
        .await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Public agency profile (`GET /api/tenants/{slug}`)
pub async fn get_tenant(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TenantResponse>, AppError> {
    let tenant = PgTenantRepository::new(state.db.clone())
        .find_by_slug(&slug)
        .await?
        .filter(|t| t.active)
        .ok_or_else(|| AppError::NotFound(format!("Agency '{}' not found", slug)))?;

    Ok(Json(tenant.into()))
}
