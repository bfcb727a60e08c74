//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Registration, login, opaque session tokens
//! - **ListingService**: Classified-ad CRUD with ownership checks
//! - **PropertyService**: Tenant-scoped property CRUD and lead intake
//! - **RestaurantService**: Restaurant profiles and menus
//! - **SubscriptionService**: Plan catalog, publication limits, payments
//! - **ImportService**: Bulk listing import normalization
//! - **ChatService**: Listing-scoped buyer/seller messaging
//! - **AdminService**: User moderation, tenants, payment review

pub mod admin_service;
pub mod auth_service;
pub mod chat_service;
pub mod import_service;
pub mod listing_service;
pub mod property_service;
pub mod restaurant_service;
pub mod subscription_service;

// Re-export auth service types
pub use auth_service::{hash_session_token, AuthError, AuthService, AuthServiceImpl};

// Re-export listing service types
pub use listing_service::{
    Actor, CreateListingDto, ListingError, ListingService, ListingServiceImpl, UpdateListingDto,
};

// Re-export property service types
pub use property_service::{
    CreateLeadDto, CreatePropertyDto, PropertyError, PropertyService, PropertyServiceImpl,
    UpdatePropertyDto,
};

// Re-export restaurant service types
pub use restaurant_service::{
    CreateMenuItemDto, CreateRestaurantDto, RestaurantError, RestaurantService,
    RestaurantServiceImpl, UpdateMenuItemDto, UpdateRestaurantDto,
};

// Re-export subscription service types
pub use subscription_service::{
    LimitCheck, SubscribeOutcome, SubscriptionError, SubscriptionService,
    SubscriptionServiceImpl, SUBSCRIPTION_PERIOD_DAYS,
};

// Re-export import service types
pub use import_service::{
    parse_condition, parse_currency, parse_price, ImportError, ImportReport, ImportRow,
    ImportService, ImportServiceImpl, RowError,
};

// Re-export chat service types
pub use chat_service::{ChatError, ChatService, ChatServiceImpl};

// Re-export admin service types
pub use admin_service::{
    AdminError, AdminService, AdminServiceImpl, CreateTenantDto, UpdateTenantDto,
};
