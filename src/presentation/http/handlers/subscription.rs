//! Subscription Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use crate::application::dto::request::SubscribeRequest;
use crate::application::dto::response::{
    LimitCheckResponse, PaymentResponse, PlanResponse, SubscriptionResponse,
};
use crate::application::services::{
    SubscriptionError, SubscriptionService, SubscriptionServiceImpl,
};
use crate::domain::{PaymentRepository, PublicationType};
use crate::infrastructure::repositories::{
    PgListingRepository, PgMenuItemRepository, PgPaymentRepository, PgPlanRepository,
    PgPropertyRepository, PgSubscriptionRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Build the subscription service from application state.
///
/// Shared with the publish and import handlers, which gate creation on
/// the plan limit.
pub(super) fn subscription_service(
    state: &AppState,
) -> SubscriptionServiceImpl<
    PgPlanRepository,
    PgSubscriptionRepository,
    PgPaymentRepository,
    PgListingRepository,
    PgPropertyRepository,
    PgMenuItemRepository,
> {
    SubscriptionServiceImpl::new(
        Arc::new(PgPlanRepository::new(state.db.clone())),
        Arc::new(PgSubscriptionRepository::new(state.db.clone())),
        Arc::new(PgPaymentRepository::new(state.db.clone())),
        Arc::new(PgListingRepository::new(state.db.clone())),
        Arc::new(PgPropertyRepository::new(state.db.clone())),
        Arc::new(PgMenuItemRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

pub(super) fn map_subscription_error(error: SubscriptionError) -> AppError {
    match error {
        SubscriptionError::PlanNotFound => AppError::NotFound("Plan not found".into()),
        SubscriptionError::PaymentNotFound => AppError::NotFound("Payment not found".into()),
        SubscriptionError::PaymentSettled => {
            AppError::Conflict("Payment already settled".into())
        }
        SubscriptionError::AlreadySubscribed => {
            AppError::Conflict("Already subscribed to this plan".into())
        }
        SubscriptionError::Internal(msg) => AppError::Internal(msg),
    }
}

/// List the plan catalog (`GET /api/subscriptions/plans`)
pub async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlanResponse>>, AppError> {
    let plans = subscription_service(&state)
        .list_plans()
        .await
        .map_err(map_subscription_error)?;

    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

/// The caller's subscription (`GET /api/subscriptions/me`)
pub async fn my_subscription(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Option<SubscriptionResponse>>, AppError> {
    let subscription = subscription_service(&state)
        .my_subscription(auth.id())
        .await
        .map_err(map_subscription_error)?;

    Ok(Json(subscription.map(|(sub, plan)| {
        SubscriptionResponse::from_parts(sub, plan)
    })))
}

/// Remaining allowance for a publication type
/// (`GET /api/subscriptions/limits/{type}`)
pub async fn check_limit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(publication_type): Path<String>,
) -> Result<Json<LimitCheckResponse>, AppError> {
    let publication_type = PublicationType::from_str(&publication_type).ok_or_else(|| {
        AppError::BadRequest(format!("unknown publication type '{}'", publication_type))
    })?;

    let check = subscription_service(&state)
        .check_publication_limit(auth.id(), publication_type)
        .await
        .map_err(map_subscription_error)?;

    Ok(Json(check.into()))
}

/// The caller's payment history (`GET /api/payments`)
pub async fn my_payments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let payments = PgPaymentRepository::new(state.db.clone())
        .list_for_user(auth.id())
        .await?;

    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// Subscribe outcome body
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub subscription_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentResponse>,
}

/// Subscribe to a plan (`POST /api/subscriptions`)
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscribeResponse>), AppError> {
    let outcome = subscription_service(&state)
        .subscribe(auth.id(), &body.plan_code, body.method)
        .await
        .map_err(map_subscription_error)?;

    Ok((
        StatusCode::CREATED,
        Json(SubscribeResponse {
            subscription_id: outcome.subscription.id.to_string(),
            status: outcome.subscription.status.as_str().to_string(),
            payment: outcome.payment.map(Into::into),
        }),
    ))
}
