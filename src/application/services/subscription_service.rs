//! Subscription Service
//!
//! Plan catalog access, the publication limit check, subscribing, and
//! admin payment review.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::{
    ListingRepository, MenuItemRepository, Payment, PaymentRepository, PaymentStatus, Plan,
    PlanRepository, PropertyRepository, PublicationType, SubscriptionRepository,
    SubscriptionStatus, UserSubscription, UNLIMITED,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Paid subscriptions run for this many days once the payment clears.
pub const SUBSCRIPTION_PERIOD_DAYS: i64 = 30;

/// Subscription service trait
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Check whether the user may publish one more record of the type.
    async fn check_publication_limit(
        &self,
        user_id: i64,
        publication_type: PublicationType,
    ) -> Result<LimitCheck, SubscriptionError>;

    /// List the plan catalog.
    async fn list_plans(&self) -> Result<Vec<Plan>, SubscriptionError>;

    /// The user's current subscription with its plan, if any.
    async fn my_subscription(
        &self,
        user_id: i64,
    ) -> Result<Option<(UserSubscription, Plan)>, SubscriptionError>;

    /// Subscribe the user to a plan. Free plans activate immediately;
    /// paid plans create a pending payment to be confirmed by an admin.
    async fn subscribe(
        &self,
        user_id: i64,
        plan_code: &str,
        method: Option<String>,
    ) -> Result<SubscribeOutcome, SubscriptionError>;

    /// Confirm a pending payment, activating its subscription.
    async fn confirm_payment(&self, payment_id: i64) -> Result<Payment, SubscriptionError>;

    /// Reject a pending payment, cancelling its subscription.
    async fn reject_payment(&self, payment_id: i64) -> Result<Payment, SubscriptionError>;
}

/// Result of a publication-limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitCheck {
    pub allowed: bool,
    /// Active records of the checked type the user currently holds
    pub current: i64,
    /// Plan ceiling; -1 means unlimited
    pub limit: i32,
    /// Set when denied without counting (no active subscription)
    pub reason: Option<&'static str>,
}

impl LimitCheck {
    fn denied_no_subscription() -> Self {
        Self {
            allowed: false,
            current: 0,
            limit: 0,
            reason: Some("no_active_subscription"),
        }
    }
}

/// Result of subscribing to a plan.
#[derive(Debug, Clone)]
pub struct SubscribeOutcome {
    pub subscription: UserSubscription,
    /// Present for paid plans only
    pub payment: Option<Payment>,
}

/// Subscription service errors
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Plan not found")]
    PlanNotFound,

    #[error("Payment not found")]
    PaymentNotFound,

    #[error("Payment already settled")]
    PaymentSettled,

    #[error("User already has an active subscription to this plan")]
    AlreadySubscribed,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// SubscriptionService implementation
pub struct SubscriptionServiceImpl<Pl, Sub, Pay, L, Pr, M>
where
    Pl: PlanRepository,
    Sub: SubscriptionRepository,
    Pay: PaymentRepository,
    L: ListingRepository,
    Pr: PropertyRepository,
    M: MenuItemRepository,
{
    plan_repo: Arc<Pl>,
    subscription_repo: Arc<Sub>,
    payment_repo: Arc<Pay>,
    listing_repo: Arc<L>,
    property_repo: Arc<Pr>,
    menu_item_repo: Arc<M>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<Pl, Sub, Pay, L, Pr, M> SubscriptionServiceImpl<Pl, Sub, Pay, L, Pr, M>
where
    Pl: PlanRepository,
    Sub: SubscriptionRepository,
    Pay: PaymentRepository,
    L: ListingRepository,
    Pr: PropertyRepository,
    M: MenuItemRepository,
{
    /// Create a new SubscriptionServiceImpl
    pub fn new(
        plan_repo: Arc<Pl>,
        subscription_repo: Arc<Sub>,
        payment_repo: Arc<Pay>,
        listing_repo: Arc<L>,
        property_repo: Arc<Pr>,
        menu_item_repo: Arc<M>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            plan_repo,
            subscription_repo,
            payment_repo,
            listing_repo,
            property_repo,
            menu_item_repo,
            id_generator,
        }
    }

    /// One COUNT query against the table the publication type lives in.
    async fn count_active(
        &self,
        user_id: i64,
        publication_type: PublicationType,
    ) -> Result<i64, SubscriptionError> {
        let count = match publication_type {
            PublicationType::Listing => self.listing_repo.count_active_for_user(user_id).await,
            PublicationType::Property => self.property_repo.count_active_for_user(user_id).await,
            PublicationType::MenuItem => self.menu_item_repo.count_for_owner(user_id).await,
        };

        count.map_err(|e| SubscriptionError::Internal(e.to_string()))
    }
}

#[async_trait]
impl<Pl, Sub, Pay, L, Pr, M> SubscriptionService
    for SubscriptionServiceImpl<Pl, Sub, Pay, L, Pr, M>
where
    Pl: PlanRepository + 'static,
    Sub: SubscriptionRepository + 'static,
    Pay: PaymentRepository + 'static,
    L: ListingRepository + 'static,
    Pr: PropertyRepository + 'static,
    M: MenuItemRepository + 'static,
{
    async fn check_publication_limit(
        &self,
        user_id: i64,
        publication_type: PublicationType,
    ) -> Result<LimitCheck, SubscriptionError> {
        let subscription = match self
            .subscription_repo
            .find_active_for_user(user_id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
        {
            Some(sub) if sub.is_active() => sub,
            _ => return Ok(LimitCheck::denied_no_subscription()),
        };

        let plan = self
            .plan_repo
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
            .ok_or_else(|| {
                SubscriptionError::Internal(format!(
                    "plan {} referenced by subscription {} is missing",
                    subscription.plan_id, subscription.id
                ))
            })?;

        let limit = plan.limit_for(publication_type);
        let current = self.count_active(user_id, publication_type).await?;

        Ok(LimitCheck {
            allowed: limit == UNLIMITED || current < limit as i64,
            current,
            limit,
            reason: None,
        })
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, SubscriptionError> {
        self.plan_repo
            .list_all()
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))
    }

    async fn my_subscription(
        &self,
        user_id: i64,
    ) -> Result<Option<(UserSubscription, Plan)>, SubscriptionError> {
        let Some(subscription) = self
            .subscription_repo
            .find_active_for_user(user_id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
        else {
            return Ok(None);
        };

        let plan = self
            .plan_repo
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
            .ok_or_else(|| {
                SubscriptionError::Internal(format!(
                    "plan {} referenced by subscription {} is missing",
                    subscription.plan_id, subscription.id
                ))
            })?;

        Ok(Some((subscription, plan)))
    }

    async fn subscribe(
        &self,
        user_id: i64,
        plan_code: &str,
        method: Option<String>,
    ) -> Result<SubscribeOutcome, SubscriptionError> {
        let plan = self
            .plan_repo
            .find_by_code(plan_code)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
            .ok_or(SubscriptionError::PlanNotFound)?;

        if let Some(existing) = self
            .subscription_repo
            .find_active_for_user(user_id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
        {
            if existing.plan_id == plan.id && existing.is_active() {
                return Err(SubscriptionError::AlreadySubscribed);
            }
        }

        let now = Utc::now();

        if plan.is_free() {
            // Free tier activates immediately and never expires.
            let subscription = UserSubscription {
                id: self.id_generator.generate(),
                user_id,
                plan_id: plan.id,
                status: SubscriptionStatus::Active,
                started_at: now,
                expires_at: None,
                created_at: now,
                updated_at: now,
            };

            let created = self
                .subscription_repo
                .create(&subscription)
                .await
                .map_err(|e| SubscriptionError::Internal(e.to_string()))?;

            self.subscription_repo
                .cancel_others_for_user(user_id, created.id)
                .await
                .map_err(|e| SubscriptionError::Internal(e.to_string()))?;

            return Ok(SubscribeOutcome {
                subscription: created,
                payment: None,
            });
        }

        // Paid tier: pending subscription + pending payment, atomically.
        let subscription = UserSubscription {
            id: self.id_generator.generate(),
            user_id,
            plan_id: plan.id,
            status: SubscriptionStatus::Pending,
            started_at: now,
            expires_at: None,
            created_at: now,
            updated_at: now,
        };

        let payment = Payment {
            id: self.id_generator.generate(),
            user_id,
            subscription_id: subscription.id,
            amount: plan.price,
            currency: plan.currency,
            method,
            reference: None,
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let (subscription, payment) = self
            .subscription_repo
            .create_with_payment(&subscription, &payment)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?;

        Ok(SubscribeOutcome {
            subscription,
            payment: Some(payment),
        })
    }

    async fn confirm_payment(&self, payment_id: i64) -> Result<Payment, SubscriptionError> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
            .ok_or(SubscriptionError::PaymentNotFound)?;

        if payment.status != PaymentStatus::Pending {
            return Err(SubscriptionError::PaymentSettled);
        }

        let mut subscription = self
            .subscription_repo
            .find_by_id(payment.subscription_id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
            .ok_or_else(|| {
                SubscriptionError::Internal(format!(
                    "subscription {} behind payment {} is missing",
                    payment.subscription_id, payment.id
                ))
            })?;

        let paid = self
            .payment_repo
            .set_status(payment.id, PaymentStatus::Paid)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?;

        let now = Utc::now();
        subscription.status = SubscriptionStatus::Active;
        subscription.started_at = now;
        subscription.expires_at = Some(now + Duration::days(SUBSCRIPTION_PERIOD_DAYS));

        self.subscription_repo
            .update(&subscription)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?;

        self.subscription_repo
            .cancel_others_for_user(subscription.user_id, subscription.id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?;

        Ok(paid)
    }

    async fn reject_payment(&self, payment_id: i64) -> Result<Payment, SubscriptionError> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
            .ok_or(SubscriptionError::PaymentNotFound)?;

        if payment.status != PaymentStatus::Pending {
            return Err(SubscriptionError::PaymentSettled);
        }

        let rejected = self
            .payment_repo
            .set_status(payment.id, PaymentStatus::Rejected)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?;

        if let Some(mut subscription) = self
            .subscription_repo
            .find_by_id(payment.subscription_id)
            .await
            .map_err(|e| SubscriptionError::Internal(e.to_string()))?
        {
            subscription.status = SubscriptionStatus::Cancelled;
            self.subscription_repo
                .update(&subscription)
                .await
                .map_err(|e| SubscriptionError::Internal(e.to_string()))?;
        }

        Ok(rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Currency, MockListingRepository, MockMenuItemRepository, MockPaymentRepository,
        MockPlanRepository, MockPropertyRepository, MockSubscriptionRepository,
    };
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn free_plan() -> Plan {
        Plan {
            id: 10,
            code: "free".into(),
            name: "Free".into(),
            price: Decimal::ZERO,
            currency: Currency::Uyu,
            max_listings: 5,
            max_properties: 1,
            max_menu_items: 10,
            created_at: Utc::now(),
        }
    }

    fn premium_plan() -> Plan {
        Plan {
            id: 30,
            code: "premium".into(),
            name: "Premium".into(),
            price: Decimal::new(99000, 2),
            currency: Currency::Uyu,
            max_listings: UNLIMITED,
            max_properties: UNLIMITED,
            max_menu_items: UNLIMITED,
            created_at: Utc::now(),
        }
    }

    fn active_subscription(plan_id: i64) -> UserSubscription {
        UserSubscription {
            id: 1,
            user_id: 42,
            plan_id,
            status: SubscriptionStatus::Active,
            ..Default::default()
        }
    }

    #[allow(clippy::type_complexity)]
    fn service(
        plan_repo: MockPlanRepository,
        subscription_repo: MockSubscriptionRepository,
        listing_repo: MockListingRepository,
    ) -> SubscriptionServiceImpl<
        MockPlanRepository,
        MockSubscriptionRepository,
        MockPaymentRepository,
        MockListingRepository,
        MockPropertyRepository,
        MockMenuItemRepository,
    > {
        SubscriptionServiceImpl::new(
            Arc::new(plan_repo),
            Arc::new(subscription_repo),
            Arc::new(MockPaymentRepository::new()),
            Arc::new(listing_repo),
            Arc::new(MockPropertyRepository::new()),
            Arc::new(MockMenuItemRepository::new()),
            Arc::new(SnowflakeGenerator::new(1, 1)),
        )
    }

    #[tokio::test]
    async fn test_no_subscription_is_denied() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_active_for_user()
            .returning(|_| Ok(None));

        let svc = service(
            MockPlanRepository::new(),
            subscription_repo,
            MockListingRepository::new(),
        );

        let check = svc
            .check_publication_limit(42, PublicationType::Listing)
            .await
            .unwrap();

        assert_eq!(
            check,
            LimitCheck {
                allowed: false,
                current: 0,
                limit: 0,
                reason: Some("no_active_subscription"),
            }
        );
    }

    #[tokio::test]
    async fn test_free_user_at_limit_is_denied() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_active_for_user()
            .returning(|_| Ok(Some(active_subscription(10))));

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(free_plan())));

        let mut listing_repo = MockListingRepository::new();
        listing_repo
            .expect_count_active_for_user()
            .returning(|_| Ok(5));

        let svc = service(plan_repo, subscription_repo, listing_repo);

        let check = svc
            .check_publication_limit(42, PublicationType::Listing)
            .await
            .unwrap();

        assert!(!check.allowed);
        assert_eq!(check.current, 5);
        assert_eq!(check.limit, 5);
        assert_eq!(check.reason, None);
    }

    #[tokio::test]
    async fn test_free_user_below_limit_is_allowed() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_active_for_user()
            .returning(|_| Ok(Some(active_subscription(10))));

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(free_plan())));

        let mut listing_repo = MockListingRepository::new();
        listing_repo
            .expect_count_active_for_user()
            .returning(|_| Ok(4));

        let svc = service(plan_repo, subscription_repo, listing_repo);

        let check = svc
            .check_publication_limit(42, PublicationType::Listing)
            .await
            .unwrap();

        assert!(check.allowed);
        assert_eq!(check.current, 4);
    }

    #[tokio::test]
    async fn test_unlimited_plan_is_never_denied() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_active_for_user()
            .returning(|_| Ok(Some(active_subscription(30))));

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(premium_plan())));

        let mut listing_repo = MockListingRepository::new();
        listing_repo
            .expect_count_active_for_user()
            .returning(|_| Ok(100_000));

        let svc = service(plan_repo, subscription_repo, listing_repo);

        let check = svc
            .check_publication_limit(42, PublicationType::Listing)
            .await
            .unwrap();

        assert!(check.allowed);
        assert_eq!(check.limit, UNLIMITED);
        assert_eq!(check.current, 100_000);
    }

    #[tokio::test]
    async fn test_expired_subscription_is_denied() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_find_active_for_user().returning(|_| {
            Ok(Some(UserSubscription {
                expires_at: Some(Utc::now() - Duration::days(1)),
                ..active_subscription(10)
            }))
        });

        let svc = service(
            MockPlanRepository::new(),
            subscription_repo,
            MockListingRepository::new(),
        );

        let check = svc
            .check_publication_limit(42, PublicationType::Listing)
            .await
            .unwrap();

        assert!(!check.allowed);
        assert_eq!(check.reason, Some("no_active_subscription"));
    }

    #[tokio::test]
    async fn test_subscribe_free_plan_activates_immediately() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_code()
            .returning(|_| Ok(Some(free_plan())));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_active_for_user()
            .returning(|_| Ok(None));
        subscription_repo
            .expect_create()
            .returning(|sub| Ok(sub.clone()));
        subscription_repo
            .expect_cancel_others_for_user()
            .returning(|_, _| Ok(0));

        let svc = service(plan_repo, subscription_repo, MockListingRepository::new());

        let outcome = svc.subscribe(42, "free", None).await.unwrap();

        assert_eq!(outcome.subscription.status, SubscriptionStatus::Active);
        assert!(outcome.subscription.expires_at.is_none());
        assert!(outcome.payment.is_none());
    }

    #[tokio::test]
    async fn test_subscribe_unknown_plan_fails() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo.expect_find_by_code().returning(|_| Ok(None));

        let svc = service(
            plan_repo,
            MockSubscriptionRepository::new(),
            MockListingRepository::new(),
        );

        let err = svc.subscribe(42, "gold", None).await.unwrap_err();
        assert!(matches!(err, SubscriptionError::PlanNotFound));
    }
}
