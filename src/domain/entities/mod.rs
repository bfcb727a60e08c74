//! # Domain Entities
//!
//! Core domain entities representing the marketplace's business objects.
//! All entities map directly to their corresponding database tables.
//!
//! ## Core Entities
//!
//! - **User**: Account with credentials, role, and optional agency link
//! - **Listing**: A classified ad in the marketplace
//! - **Category / Zone**: Catalog rows used to file and filter listings
//! - **Tenant**: A real-estate agency namespace
//! - **Property**: A real-estate publication owned by a tenant
//! - **Restaurant / MenuItem**: Restaurant profiles and their menus
//!
//! ## Supporting Entities
//!
//! - **Plan / UserSubscription**: The plan catalog and per-user
//!   subscriptions that gate publication limits
//! - **Payment**: Manually confirmed subscription payments
//! - **Lead**: Visitor inquiries against a property
//! - **Message**: Buyer/seller chat rows scoped to a listing
//! - **Session**: Opaque-token browser sessions
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod category;
mod lead;
mod listing;
mod menu_item;
mod message;
mod payment;
mod property;
mod restaurant;
mod session;
mod subscription;
mod tenant;
mod user;
mod zone;

pub use user::{User, UserQuery, UserRepository, UserRole, UserStatus};

pub use session::{Session, SessionRepository};

pub use category::{Category, CategoryRepository};

pub use zone::{slugify, Zone, ZoneRepository};

pub use listing::{
    Listing, ListingCondition, ListingFilter, ListingRepository, ListingStatus,
};

pub use tenant::{Tenant, TenantRepository};

pub use property::{
    OperationType, Property, PropertyFilter, PropertyRepository, PropertyStatus, PropertyType,
};

pub use restaurant::{Restaurant, RestaurantRepository};

pub use menu_item::{MenuItem, MenuItemRepository};

pub use subscription::{
    Plan, PlanRepository, PublicationType, SubscriptionRepository, SubscriptionStatus,
    UserSubscription, UNLIMITED,
};

pub use payment::{Payment, PaymentRepository, PaymentStatus};

pub use lead::{Lead, LeadRepository, LeadStatus};

pub use message::{Message, MessageRepository};

#[cfg(test)]
pub use category::MockCategoryRepository;
#[cfg(test)]
pub use listing::MockListingRepository;
#[cfg(test)]
pub use menu_item::MockMenuItemRepository;
#[cfg(test)]
pub use payment::MockPaymentRepository;
#[cfg(test)]
pub use property::MockPropertyRepository;
#[cfg(test)]
pub use subscription::{MockPlanRepository, MockSubscriptionRepository};
#[cfg(test)]
pub use zone::MockZoneRepository;
