//! Property Handlers
//!
//! Public search, tenant-scoped publishing, and lead intake.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::{
    CreateLeadRequest, CreatePropertyRequest, LeadQueryParams, PropertyQueryParams,
    UpdateLeadRequest, UpdatePropertyRequest, UpdateStatusRequest,
};
use crate::application::dto::response::{
    LeadResponse, PropertyListResponse, PropertyResponse,
};
use crate::application::services::{
    CreateLeadDto, CreatePropertyDto, PropertyError, PropertyService, PropertyServiceImpl,
    SubscriptionService, UpdatePropertyDto,
};
use crate::domain::{
    LeadStatus, OperationType, PropertyFilter, PropertyStatus, PropertyType, PublicationType,
};
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{
    PgLeadRepository, PgPropertyRepository, PgTenantRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::{parse_currency_field, parse_id};

/// Build the property service from application state.
fn property_service(
    state: &AppState,
) -> PropertyServiceImpl<PgPropertyRepository, PgTenantRepository, PgLeadRepository> {
    PropertyServiceImpl::new(
        Arc::new(PgPropertyRepository::new(state.db.clone())),
        Arc::new(PgTenantRepository::new(state.db.clone())),
        Arc::new(PgLeadRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_property_error(error: PropertyError) -> AppError {
    match error {
        PropertyError::NotFound => AppError::NotFound("Property not found".into()),
        PropertyError::LeadNotFound => AppError::NotFound("Lead not found".into()),
        PropertyError::Forbidden => AppError::Forbidden("Not a member of this agency".into()),
        PropertyError::NoTenant => {
            AppError::Forbidden("User does not belong to an agency".into())
        }
        PropertyError::TenantInactive => AppError::Forbidden("Agency is inactive".into()),
        PropertyError::Internal(msg) => AppError::Internal(msg),
    }
}

fn parse_operation(value: &str) -> Result<OperationType, AppError> {
    match value {
        "sale" => Ok(OperationType::Sale),
        "rent" => Ok(OperationType::Rent),
        other => Err(AppError::BadRequest(format!("invalid operation '{}'", other))),
    }
}

fn parse_property_type(value: &str) -> Result<PropertyType, AppError> {
    match value {
        "apartment" => Ok(PropertyType::Apartment),
        "house" => Ok(PropertyType::House),
        "land" => Ok(PropertyType::Land),
        "commercial" => Ok(PropertyType::Commercial),
        other => Err(AppError::BadRequest(format!(
            "invalid property type '{}'",
            other
        ))),
    }
}

fn parse_status(value: &str) -> Result<PropertyStatus, AppError> {
    match value {
        "active" => Ok(PropertyStatus::Active),
        "paused" => Ok(PropertyStatus::Paused),
        "sold" => Ok(PropertyStatus::Sold),
        other => Err(AppError::BadRequest(format!("invalid status '{}'", other))),
    }
}

fn parse_lead_status(value: &str) -> Result<LeadStatus, AppError> {
    match value {
        "new" => Ok(LeadStatus::New),
        "contacted" => Ok(LeadStatus::Contacted),
        "closed" => Ok(LeadStatus::Closed),
        other => Err(AppError::BadRequest(format!(
            "invalid lead status '{}'",
            other
        ))),
    }
}

/// Search active properties (`GET /api/properties`)
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<PropertyQueryParams>,
) -> Result<Json<PropertyListResponse>, AppError> {
    let filter = PropertyFilter {
        operation: params.operation.as_deref().map(parse_operation).transpose()?,
        property_type: params
            .property_type
            .as_deref()
            .map(parse_property_type)
            .transpose()?,
        zone_id: params.zone.as_deref().map(parse_id).transpose()?,
        tenant_id: params.tenant.as_deref().map(parse_id).transpose()?,
        min_price: params.min_price,
        max_price: params.max_price,
        min_bedrooms: params.min_bedrooms,
        limit: params.limit.unwrap_or(20).clamp(1, 100),
        offset: params.offset.unwrap_or(0).max(0),
    };

    let (items, total) = property_service(&state)
        .search(filter)
        .await
        .map_err(map_property_error)?;

    Ok(Json(PropertyListResponse {
        items: items.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Fetch one property (`GET /api/properties/{id}`)
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyResponse>, AppError> {
    let property = property_service(&state)
        .get(parse_id(&id)?)
        .await
        .map_err(map_property_error)?;

    Ok(Json(property.into()))
}

/// Publish a property, gated on the plan limit (`POST /api/publish/property`)
pub async fn publish(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<PropertyResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let check = super::subscription::subscription_service(&state)
        .check_publication_limit(auth.id(), PublicationType::Property)
        .await
        .map_err(super::subscription::map_subscription_error)?;

    if !check.allowed {
        return Err(AppError::Forbidden(match check.reason {
            Some(reason) => reason.to_string(),
            None => format!("publication limit reached ({}/{})", check.current, check.limit),
        }));
    }

    let property = property_service(&state)
        .create(
            &auth.user,
            CreatePropertyDto {
                zone_id: parse_id(&body.zone_id)?,
                title: body.title,
                description: body.description.unwrap_or_default(),
                operation: parse_operation(&body.operation)?,
                property_type: parse_property_type(&body.property_type)?,
                price: body.price,
                currency: parse_currency_field(body.currency.as_deref())?,
                bedrooms: body.bedrooms,
                bathrooms: body.bathrooms,
                area_m2: body.area_m2,
                address: body.address,
                photo_urls: body.photo_urls,
            },
        )
        .await
        .map_err(map_property_error)?;

    metrics::record_publication(PublicationType::Property.as_str());

    Ok((StatusCode::CREATED, Json(property.into())))
}

/// Update a property (`PATCH /api/properties/{id}`)
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePropertyRequest>,
) -> Result<Json<PropertyResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let update = UpdatePropertyDto {
        zone_id: body.zone_id.as_deref().map(parse_id).transpose()?,
        title: body.title,
        description: body.description,
        operation: body.operation.as_deref().map(parse_operation).transpose()?,
        property_type: body
            .property_type
            .as_deref()
            .map(parse_property_type)
            .transpose()?,
        price: body.price,
        currency: match body.currency.as_deref() {
            Some(value) => Some(parse_currency_field(Some(value))?),
            None => None,
        },
        bedrooms: body.bedrooms,
        bathrooms: body.bathrooms,
        area_m2: body.area_m2,
        address: body.address,
        photo_urls: body.photo_urls,
    };

    let property = property_service(&state)
        .update(parse_id(&id)?, &auth.user, update)
        .await
        .map_err(map_property_error)?;

    Ok(Json(property.into()))
}

/// Pause/reactivate/mark sold (`PATCH /api/properties/{id}/status`)
pub async fn set_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<StatusCode, AppError> {
    property_service(&state)
        .set_status(parse_id(&id)?, &auth.user, parse_status(&body.status)?)
        .await
        .map_err(map_property_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Soft delete (`DELETE /api/properties/{id}`)
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    property_service(&state)
        .set_status(parse_id(&id)?, &auth.user, PropertyStatus::Deleted)
        .await
        .map_err(map_property_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Public contact form (`POST /api/properties/{id}/leads`)
pub async fn create_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let lead = property_service(&state)
        .create_lead(
            parse_id(&id)?,
            CreateLeadDto {
                name: body.name,
                email: body.email,
                phone: body.phone,
                message: body.message,
            },
        )
        .await
        .map_err(map_property_error)?;

    Ok((StatusCode::CREATED, Json(lead.into())))
}

/// Agency lead inbox (`GET /api/leads`)
pub async fn list_leads(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<LeadQueryParams>,
) -> Result<Json<Vec<LeadResponse>>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(parse_lead_status)
        .transpose()?;

    let leads = property_service(&state)
        .list_leads(
            &auth.user,
            status,
            params.limit.unwrap_or(50).clamp(1, 200),
            params.offset.unwrap_or(0).max(0),
        )
        .await
        .map_err(map_property_error)?;

    Ok(Json(leads.into_iter().map(Into::into).collect()))
}

/// Update lead handling status (`PATCH /api/leads/{id}`)
pub async fn update_lead(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateLeadRequest>,
) -> Result<StatusCode, AppError> {
    property_service(&state)
        .set_lead_status(parse_id(&id)?, &auth.user, parse_lead_status(&body.status)?)
        .await
        .map_err(map_property_error)?;

    Ok(StatusCode::NO_CONTENT)
}
