//! Listing Service
//!
//! CRUD orchestration for classified ads with ownership checks.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{
    Currency, Listing, ListingCondition, ListingFilter, ListingRepository, ListingStatus,
    UserRole,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Listing service trait
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Create a listing (the publish handler performs the limit check).
    async fn create(&self, input: CreateListingDto) -> Result<Listing, ListingError>;

    /// Fetch a listing; soft-deleted rows read as missing.
    async fn get(&self, listing_id: i64) -> Result<Listing, ListingError>;

    /// Search active listings.
    async fn search(&self, filter: ListingFilter) -> Result<(Vec<Listing>, i64), ListingError>;

    /// Update a listing; only the owner or an admin may.
    async fn update(
        &self,
        listing_id: i64,
        actor: Actor,
        update: UpdateListingDto,
    ) -> Result<Listing, ListingError>;

    /// Change the status (pause, reactivate, mark sold).
    async fn set_status(
        &self,
        listing_id: i64,
        actor: Actor,
        status: ListingStatus,
    ) -> Result<(), ListingError>;

    /// Soft delete.
    async fn delete(&self, listing_id: i64, actor: Actor) -> Result<(), ListingError>;
}

/// The authenticated user acting on a listing.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: i64,
    pub role: UserRole,
}

impl Actor {
    fn may_manage(&self, owner_id: i64) -> bool {
        self.user_id == owner_id || self.role == UserRole::Admin
    }
}

/// Create listing input
#[derive(Debug, Clone)]
pub struct CreateListingDto {
    pub user_id: i64,
    pub category_id: i64,
    pub zone_id: i64,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub currency: Currency,
    pub condition: ListingCondition,
    pub whatsapp: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub photo_urls: Vec<String>,
}

/// Update listing input; None leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateListingDto {
    pub category_id: Option<i64>,
    pub zone_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<Currency>,
    pub condition: Option<ListingCondition>,
    pub whatsapp: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub photo_urls: Option<Vec<String>>,
}

/// Listing service errors
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("Listing not found")]
    NotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ListingService implementation
pub struct ListingServiceImpl<L>
where
    L: ListingRepository,
{
    listing_repo: Arc<L>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<L> ListingServiceImpl<L>
where
    L: ListingRepository,
{
    /// Create a new ListingServiceImpl
    pub fn new(listing_repo: Arc<L>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            listing_repo,
            id_generator,
        }
    }

    async fn load_owned(&self, listing_id: i64, actor: Actor) -> Result<Listing, ListingError> {
        let listing = self
            .listing_repo
            .find_by_id(listing_id)
            .await
            .map_err(|e| ListingError::Internal(e.to_string()))?
            .filter(|l| !l.is_deleted())
            .ok_or(ListingError::NotFound)?;

        if !actor.may_manage(listing.user_id) {
            return Err(ListingError::Forbidden);
        }

        Ok(listing)
    }
}

#[async_trait]
impl<L> ListingService for ListingServiceImpl<L>
where
    L: ListingRepository + 'static,
{
    async fn create(&self, input: CreateListingDto) -> Result<Listing, ListingError> {
        let now = chrono::Utc::now();
        let listing = Listing {
            id: self.id_generator.generate(),
            user_id: input.user_id,
            category_id: input.category_id,
            zone_id: input.zone_id,
            title: input.title,
            description: input.description,
            price: input.price,
            currency: input.currency,
            condition: input.condition,
            status: ListingStatus::Active,
            whatsapp: input.whatsapp,
            phone: input.phone,
            email: input.email,
            instagram: input.instagram,
            photo_urls: input.photo_urls,
            created_at: now,
            updated_at: now,
        };

        self.listing_repo
            .create(&listing)
            .await
            .map_err(|e| ListingError::Internal(e.to_string()))
    }

    async fn get(&self, listing_id: i64) -> Result<Listing, ListingError> {
        self.listing_repo
            .find_by_id(listing_id)
            .await
            .map_err(|e| ListingError::Internal(e.to_string()))?
            .filter(|l| !l.is_deleted())
            .ok_or(ListingError::NotFound)
    }

    async fn search(&self, filter: ListingFilter) -> Result<(Vec<Listing>, i64), ListingError> {
        let items = self
            .listing_repo
            .search(&filter)
            .await
            .map_err(|e| ListingError::Internal(e.to_string()))?;

        let total = self
            .listing_repo
            .count_search(&filter)
            .await
            .map_err(|e| ListingError::Internal(e.to_string()))?;

        Ok((items, total))
    }

    async fn update(
        &self,
        listing_id: i64,
        actor: Actor,
        update: UpdateListingDto,
    ) -> Result<Listing, ListingError> {
        let mut listing = self.load_owned(listing_id, actor).await?;

        if let Some(category_id) = update.category_id {
            listing.category_id = category_id;
        }
        if let Some(zone_id) = update.zone_id {
            listing.zone_id = zone_id;
        }
        if let Some(title) = update.title {
            listing.title = title;
        }
        if let Some(description) = update.description {
            listing.description = description;
        }
        if let Some(price) = update.price {
            listing.price = price;
        }
        if let Some(currency) = update.currency {
            listing.currency = currency;
        }
        if let Some(condition) = update.condition {
            listing.condition = condition;
        }
        if let Some(whatsapp) = update.whatsapp {
            listing.whatsapp = Some(whatsapp);
        }
        if let Some(phone) = update.phone {
            listing.phone = Some(phone);
        }
        if let Some(email) = update.email {
            listing.email = Some(email);
        }
        if let Some(instagram) = update.instagram {
            listing.instagram = Some(instagram);
        }
        if let Some(photo_urls) = update.photo_urls {
            listing.photo_urls = photo_urls;
        }

        self.listing_repo
            .update(&listing)
            .await
            .map_err(|e| ListingError::Internal(e.to_string()))
    }

    async fn set_status(
        &self,
        listing_id: i64,
        actor: Actor,
        status: ListingStatus,
    ) -> Result<(), ListingError> {
        self.load_owned(listing_id, actor).await?;

        self.listing_repo
            .set_status(listing_id, status)
            .await
            .map_err(|e| ListingError::Internal(e.to_string()))
    }

    async fn delete(&self, listing_id: i64, actor: Actor) -> Result<(), ListingError> {
        self.set_status(listing_id, actor, ListingStatus::Deleted)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockListingRepository;
    use crate::shared::error::AppError;

    fn actor(user_id: i64) -> Actor {
        Actor {
            user_id,
            role: UserRole::User,
        }
    }

    fn admin() -> Actor {
        Actor {
            user_id: 999,
            role: UserRole::Admin,
        }
    }

    fn owned_listing(owner: i64) -> Listing {
        Listing {
            id: 1,
            user_id: owner,
            title: "Mesa".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let mut repo = MockListingRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(owned_listing(100))));

        let svc = ListingServiceImpl::new(Arc::new(repo), Arc::new(SnowflakeGenerator::new(1, 1)));

        let err = svc
            .update(1, actor(200), UpdateListingDto::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ListingError::Forbidden));
    }

    #[tokio::test]
    async fn test_admin_may_update_any_listing() {
        let mut repo = MockListingRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(owned_listing(100))));
        repo.expect_update().returning(|l| Ok(l.clone()));

        let svc = ListingServiceImpl::new(Arc::new(repo), Arc::new(SnowflakeGenerator::new(1, 1)));

        let updated = svc
            .update(
                1,
                admin(),
                UpdateListingDto {
                    title: Some("Mesa de roble".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Mesa de roble");
    }

    #[tokio::test]
    async fn test_soft_deleted_listing_reads_as_missing() {
        let mut repo = MockListingRepository::new();
        repo.expect_find_by_id().returning(|_| {
            Ok(Some(Listing {
                status: ListingStatus::Deleted,
                ..owned_listing(100)
            }))
        });

        let svc = ListingServiceImpl::new(Arc::new(repo), Arc::new(SnowflakeGenerator::new(1, 1)));

        assert!(matches!(svc.get(1).await.unwrap_err(), ListingError::NotFound));
    }

    #[tokio::test]
    async fn test_repo_errors_surface_as_internal() {
        let mut repo = MockListingRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(AppError::Internal("db down".into())));

        let svc = ListingServiceImpl::new(Arc::new(repo), Arc::new(SnowflakeGenerator::new(1, 1)));

        assert!(matches!(
            svc.get(1).await.unwrap_err(),
            ListingError::Internal(_)
        ));
    }
}
