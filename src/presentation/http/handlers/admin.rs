//! Admin Handlers
//!
//! User moderation, payment review, and tenant management. All routes
//! here sit behind `require_admin`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{
    AdminPaymentsQueryParams, AdminUsersQueryParams, CreateTenantRequest, UpdateTenantRequest,
    UpdateUserStatusRequest,
};
use crate::application::dto::response::{
    PaymentResponse, TenantResponse, UserListResponse, UserResponse,
};
use crate::application::services::{
    AdminError, AdminService, AdminServiceImpl, CreateTenantDto, SubscriptionService,
    UpdateTenantDto,
};
use crate::domain::{PaymentStatus, UserQuery, UserStatus};
use crate::infrastructure::repositories::{
    PgPaymentRepository, PgSessionRepository, PgTenantRepository, PgUserRepository,
};
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

use super::parse_id;

/// Build the admin service from application state.
fn admin_service(
    state: &AppState,
) -> AdminServiceImpl<PgUserRepository, PgSessionRepository, PgTenantRepository, PgPaymentRepository>
{
    AdminServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgSessionRepository::new(state.db.clone())),
        Arc::new(PgTenantRepository::new(state.db.clone())),
        Arc::new(PgPaymentRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn map_admin_error(error: AdminError) -> AppError {
    match error {
        AdminError::UserNotFound => AppError::NotFound("User not found".into()),
        AdminError::TenantNotFound => AppError::NotFound("Tenant not found".into()),
        AdminError::Conflict(msg) => AppError::Conflict(msg),
        AdminError::Internal(msg) => AppError::Internal(msg),
    }
}

fn parse_user_status(value: &str) -> Result<UserStatus, AppError> {
    match value {
        "active" => Ok(UserStatus::Active),
        "suspended" => Ok(UserStatus::Suspended),
        other => Err(AppError::BadRequest(format!(
            "invalid user status '{}'",
            other
        ))),
    }
}

fn parse_payment_status(value: &str) -> Result<PaymentStatus, AppError> {
    match value {
        "pending" => Ok(PaymentStatus::Pending),
        "paid" => Ok(PaymentStatus::Paid),
        "rejected" => Ok(PaymentStatus::Rejected),
        other => Err(AppError::BadRequest(format!(
            "invalid payment status '{}'",
            other
        ))),
    }
}

/// List/search users (`GET /api/admin/users`)
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<AdminUsersQueryParams>,
) -> Result<Json<UserListResponse>, AppError> {
    let query = UserQuery {
        search: params.q,
        status: params.status.as_deref().map(parse_user_status).transpose()?,
        limit: params.limit.unwrap_or(50).clamp(1, 200),
        offset: params.offset.unwrap_or(0).max(0),
    };

    let (users, total) = admin_service(&state)
        .list_users(query)
        .await
        .map_err(map_admin_error)?;

    Ok(Json(UserListResponse {
        items: users
            .into_iter()
            .map(|u| UserResponse::from_user(u, true))
            .collect(),
        total,
    }))
}

/// Suspend or restore an account (`PATCH /api/admin/users/{id}/status`)
pub async fn set_user_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserStatusRequest>,
) -> Result<StatusCode, AppError> {
    admin_service(&state)
        .set_user_status(parse_id(&id)?, parse_user_status(&body.status)?)
        .await
        .map_err(map_admin_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Hard delete an account (`DELETE /api/admin/users/{id}`)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    admin_service(&state)
        .delete_user(parse_id(&id)?)
        .await
        .map_err(map_admin_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Payment review queue (`GET /api/admin/payments`)
pub async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<AdminPaymentsQueryParams>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(parse_payment_status)
        .transpose()?
        .unwrap_or(PaymentStatus::Pending);

    let payments = admin_service(&state)
        .list_payments(
            status,
            params.limit.unwrap_or(50).clamp(1, 200),
            params.offset.unwrap_or(0).max(0),
        )
        .await
        .map_err(map_admin_error)?;

    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// Confirm a pending payment (`POST /api/admin/payments/{id}/confirm`)
pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment = super::subscription::subscription_service(&state)
        .confirm_payment(parse_id(&id)?)
        .await
        .map_err(super::subscription::map_subscription_error)?;

    Ok(Json(payment.into()))
}

/// Reject a pending payment (`POST /api/admin/payments/{id}/reject`)
pub async fn reject_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment = super::subscription::subscription_service(&state)
        .reject_payment(parse_id(&id)?)
        .await
        .map_err(super::subscription::map_subscription_error)?;

    Ok(Json(payment.into()))
}

/// List tenants (`GET /api/admin/tenants`)
pub async fn list_tenants(
    State(state): State<AppState>,
) -> Result<Json<Vec<TenantResponse>>, AppError> {
    let tenants = admin_service(&state)
        .list_tenants(false)
        .await
        .map_err(map_admin_error)?;

    Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

/// Create a tenant (`POST /api/admin/tenants`)
pub async fn create_tenant(
    State(state): State<AppState>,
    Json(body): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<TenantResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let tenant = admin_service(&state)
        .create_tenant(CreateTenantDto {
            name: body.name,
            contact_email: body.contact_email,
            contact_phone: body.contact_phone,
        })
        .await
        .map_err(map_admin_error)?;

    Ok((StatusCode::CREATED, Json(tenant.into())))
}

/// Update a tenant (`PATCH /api/admin/tenants/{id}`)
pub async fn update_tenant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTenantRequest>,
) -> Result<Json<TenantResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let tenant_id = parse_id(&id)?;
    let service = admin_service(&state);

    if let Some(active) = body.active {
        service
            .set_tenant_active(tenant_id, active)
            .await
            .map_err(map_admin_error)?;
    }

    let tenant = service
        .update_tenant(
            tenant_id,
            UpdateTenantDto {
                name: body.name,
                contact_email: body.contact_email,
                contact_phone: body.contact_phone,
            },
        )
        .await
        .map_err(map_admin_error)?;

    Ok(Json(tenant.into()))
}
