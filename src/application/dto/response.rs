//! Response DTOs
//!
//! Data structures for API response bodies. Snowflake IDs are serialized
//! as strings for JavaScript number-safety; timestamps as RFC 3339.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::services::{ImportReport, LimitCheck, RowError};
use crate::domain::{
    Category, Lead, Listing, MenuItem, Message, Payment, Plan, Property, Restaurant, Tenant,
    User, UserSubscription, Zone,
};

/// Zone response
#[derive(Debug, Serialize)]
pub struct ZoneResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<Zone> for ZoneResponse {
    fn from(zone: Zone) -> Self {
        Self {
            id: zone.id.to_string(),
            name: zone.name,
            slug: zone.slug,
        }
    }
}

/// Category response
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub position: i32,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name,
            slug: category.slug,
            position: category.position,
        }
    }
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub created_at: String,
}

impl UserResponse {
    /// Build from the entity; `include_email` is true only for the
    /// account owner and admins.
    pub fn from_user(user: User, include_email: bool) -> Self {
        Self {
            id: user.id.to_string(),
            email: if include_email { Some(user.email) } else { None },
            display_name: user.display_name,
            phone: user.phone,
            role: user.role.as_str().to_string(),
            status: user.status.as_str().to_string(),
            tenant_id: user.tenant_id.map(|id| id.to_string()),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Listing response
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub zone_id: String,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub currency: String,
    pub condition: String,
    pub status: String,
    pub whatsapp: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub photo_urls: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id.to_string(),
            user_id: listing.user_id.to_string(),
            category_id: listing.category_id.to_string(),
            zone_id: listing.zone_id.to_string(),
            title: listing.title,
            description: listing.description,
            price: listing.price,
            currency: listing.currency.as_str().to_string(),
            condition: listing.condition.as_str().to_string(),
            status: listing.status.as_str().to_string(),
            whatsapp: listing.whatsapp,
            phone: listing.phone,
            email: listing.email,
            instagram: listing.instagram,
            photo_urls: listing.photo_urls,
            created_at: listing.created_at.to_rfc3339(),
            updated_at: listing.updated_at.to_rfc3339(),
        }
    }
}

/// Paginated listing search response
#[derive(Debug, Serialize)]
pub struct ListingListResponse {
    pub items: Vec<ListingResponse>,
    pub total: i64,
}

/// Property response
#[derive(Debug, Serialize)]
pub struct PropertyResponse {
    pub id: String,
    pub tenant_id: String,
    pub zone_id: String,
    pub title: String,
    pub description: String,
    pub operation: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: Decimal,
    pub currency: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_m2: Option<Decimal>,
    pub address: Option<String>,
    pub photo_urls: Vec<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Property> for PropertyResponse {
    fn from(property: Property) -> Self {
        Self {
            id: property.id.to_string(),
            tenant_id: property.tenant_id.to_string(),
            zone_id: property.zone_id.to_string(),
            title: property.title,
            description: property.description,
            operation: property.operation.as_str().to_string(),
            property_type: property.property_type.as_str().to_string(),
            price: property.price,
            currency: property.currency.as_str().to_string(),
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            area_m2: property.area_m2,
            address: property.address,
            photo_urls: property.photo_urls,
            status: property.status.as_str().to_string(),
            created_at: property.created_at.to_rfc3339(),
            updated_at: property.updated_at.to_rfc3339(),
        }
    }
}

/// Paginated property search response
#[derive(Debug, Serialize)]
pub struct PropertyListResponse {
    pub items: Vec<PropertyResponse>,
    pub total: i64,
}

/// Tenant response
#[derive(Debug, Serialize)]
pub struct TenantResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub active: bool,
    pub created_at: String,
}

impl From<Tenant> for TenantResponse {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id.to_string(),
            name: tenant.name,
            slug: tenant.slug,
            contact_email: tenant.contact_email,
            contact_phone: tenant.contact_phone,
            active: tenant.active,
            created_at: tenant.created_at.to_rfc3339(),
        }
    }
}

/// Restaurant response
#[derive(Debug, Serialize)]
pub struct RestaurantResponse {
    pub id: String,
    pub zone_id: String,
    pub name: String,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub photo_url: Option<String>,
    pub active: bool,
    pub created_at: String,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id.to_string(),
            zone_id: restaurant.zone_id.to_string(),
            name: restaurant.name,
            description: restaurant.description,
            cuisine: restaurant.cuisine,
            address: restaurant.address,
            phone: restaurant.phone,
            whatsapp: restaurant.whatsapp,
            photo_url: restaurant.photo_url,
            active: restaurant.active,
            created_at: restaurant.created_at.to_rfc3339(),
        }
    }
}

/// Menu item response
#[derive(Debug, Serialize)]
pub struct MenuItemResponse {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub available: bool,
    pub position: i32,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            restaurant_id: item.restaurant_id.to_string(),
            name: item.name,
            description: item.description,
            price: item.price,
            currency: item.currency.as_str().to_string(),
            available: item.available,
            position: item.position,
        }
    }
}

/// Restaurant with its menu
#[derive(Debug, Serialize)]
pub struct RestaurantDetailResponse {
    #[serde(flatten)]
    pub restaurant: RestaurantResponse,
    pub menu: Vec<MenuItemResponse>,
}

/// Plan response
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub code: String,
    pub name: String,
    pub price: Decimal,
    pub currency: String,
    pub max_listings: i32,
    pub max_properties: i32,
    pub max_menu_items: i32,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            code: plan.code,
            name: plan.name,
            price: plan.price,
            currency: plan.currency.as_str().to_string(),
            max_listings: plan.max_listings,
            max_properties: plan.max_properties,
            max_menu_items: plan.max_menu_items,
        }
    }
}

/// Subscription response
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub plan: PlanResponse,
    pub status: String,
    pub started_at: String,
    pub expires_at: Option<String>,
}

impl SubscriptionResponse {
    pub fn from_parts(subscription: UserSubscription, plan: Plan) -> Self {
        Self {
            id: subscription.id.to_string(),
            plan: plan.into(),
            status: subscription.status.as_str().to_string(),
            started_at: subscription.started_at.to_rfc3339(),
            expires_at: subscription.expires_at.map(|e| e.to_rfc3339()),
        }
    }
}

/// Payment response
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub user_id: String,
    pub subscription_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            user_id: payment.user_id.to_string(),
            subscription_id: payment.subscription_id.to_string(),
            amount: payment.amount,
            currency: payment.currency.as_str().to_string(),
            method: payment.method,
            reference: payment.reference,
            status: payment.status.as_str().to_string(),
            created_at: payment.created_at.to_rfc3339(),
        }
    }
}

/// Publication limit check response
#[derive(Debug, Serialize)]
pub struct LimitCheckResponse {
    pub allowed: bool,
    pub current: i64,
    pub limit: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl From<LimitCheck> for LimitCheckResponse {
    fn from(check: LimitCheck) -> Self {
        Self {
            allowed: check.allowed,
            current: check.current,
            limit: check.limit,
            reason: check.reason,
        }
    }
}

/// Lead response
#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub id: String,
    pub property_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: String,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id.to_string(),
            property_id: lead.property_id.to_string(),
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            message: lead.message,
            status: lead.status.as_str().to_string(),
            created_at: lead.created_at.to_rfc3339(),
        }
    }
}

/// Chat message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub listing_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub body: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            listing_id: message.listing_id.to_string(),
            sender_id: message.sender_id.to_string(),
            recipient_id: message.recipient_id.to_string(),
            body: message.body,
            read: message.read,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

/// Bulk import report response
#[derive(Debug, Serialize)]
pub struct ImportReportResponse {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

impl From<ImportReport> for ImportReportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            imported: report.imported,
            skipped: report.skipped,
            errors: report.errors,
        }
    }
}

/// Admin user listing response
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    #[test]
    fn test_user_response_hides_email_for_strangers() {
        let user = User {
            id: 7,
            email: "vendor@example.com".into(),
            role: UserRole::User,
            ..Default::default()
        };

        let public = UserResponse::from_user(user.clone(), false);
        assert!(public.email.is_none());

        let own = UserResponse::from_user(user, true);
        assert_eq!(own.email.as_deref(), Some("vendor@example.com"));
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let listing = Listing {
            id: 9007199254740993, // above 2^53, unsafe as a JS number
            user_id: 1,
            ..Default::default()
        };

        let response: ListingResponse = listing.into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"id\":\"9007199254740993\""));
    }
}
