//! Request DTOs
//!
//! Data structures for API request bodies and query strings. Snowflake
//! IDs travel as strings on the wire.

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::application::services::ImportRow;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 60, message = "Display name must be at most 60 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Update profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 60, message = "Display name must be at most 60 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,
}

/// Create listing request (`POST /api/publish/listing`)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    pub category_id: String,
    pub zone_id: String,

    pub price: Decimal,

    /// UYU or USD; pesos when omitted
    pub currency: Option<String>,

    /// new or used; used when omitted
    pub condition: Option<String>,

    pub whatsapp: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,

    #[serde(default)]
    pub photo_urls: Vec<String>,
}

/// Update listing request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateListingRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    pub category_id: Option<String>,
    pub zone_id: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub condition: Option<String>,
    pub whatsapp: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub photo_urls: Option<Vec<String>>,
}

/// Status change request (listings and properties)
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Listing search query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListingQueryParams {
    pub zone: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Create property request (`POST /api/publish/property`)
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    pub zone_id: String,

    /// sale or rent
    pub operation: String,

    /// apartment, house, land, or commercial
    #[serde(rename = "type")]
    pub property_type: String,

    pub price: Decimal,
    pub currency: Option<String>,

    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_m2: Option<Decimal>,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,

    #[serde(default)]
    pub photo_urls: Vec<String>,
}

/// Update property request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePropertyRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    pub zone_id: Option<String>,
    pub operation: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_m2: Option<Decimal>,
    pub address: Option<String>,
    pub photo_urls: Option<Vec<String>>,
}

/// Property search query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PropertyQueryParams {
    pub operation: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub zone: Option<String>,
    pub tenant: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_bedrooms: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Create restaurant request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRestaurantRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    pub zone_id: String,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub photo_url: Option<String>,
}

/// Update restaurant request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRestaurantRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    pub zone_id: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub photo_url: Option<String>,
}

/// Restaurant browse query parameters
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantQueryParams {
    pub zone: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Create menu item request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    pub description: Option<String>,
    pub price: Decimal,
    pub currency: Option<String>,

    #[serde(default)]
    pub position: i32,
}

/// Update menu item request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub available: Option<bool>,
    pub position: Option<i32>,
}

/// Subscribe request
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub plan_code: String,
    pub method: Option<String>,
}

/// Create lead request (public contact form)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

/// Lead status change request
#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    pub status: String,
}

/// Lead listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct LeadQueryParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Send chat message request
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Body must be 1-2000 characters"))]
    pub body: String,

    /// Required when the listing owner replies
    pub to_user: Option<String>,
}

/// Conversation query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ConversationQueryParams {
    pub with_user: Option<String>,
    pub limit: Option<i64>,
}

/// Bulk import request (`POST /api/import/listings`)
#[derive(Debug, Deserialize)]
pub struct ImportListingsRequest {
    pub rows: Vec<ImportRow>,
}

/// Admin user listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct AdminUsersQueryParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Admin user status change request
#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: String,
}

/// Admin payment queue query parameters
#[derive(Debug, Default, Deserialize)]
pub struct AdminPaymentsQueryParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Create tenant request (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenantRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub contact_email: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub contact_phone: Option<String>,
}

/// Update tenant request (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTenantRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub contact_email: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub contact_phone: Option<String>,

    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_fails_validation() {
        let request = CreateListingRequest {
            title: String::new(),
            description: None,
            category_id: "1".into(),
            zone_id: "2".into(),
            price: Decimal::new(100, 0),
            currency: None,
            condition: None,
            whatsapp: None,
            phone: None,
            email: None,
            instagram: None,
            photo_urls: vec![],
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_short_password_fails_validation() {
        let request = RegisterRequest {
            email: "user@example.com".into(),
            password: "short".into(),
            display_name: None,
            phone: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_valid_register_request_passes() {
        use fake::faker::internet::en::SafeEmail;
        use fake::Fake;

        let request = RegisterRequest {
            email: SafeEmail().fake(),
            password: "longenough1!".into(),
            display_name: Some("Vendor".into()),
            phone: None,
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_import_request_deserializes_template_columns() {
        let json = r#"{
            "rows": [{
                "titulo": "Mesa",
                "categoria": "Muebles",
                "zona": "Pocitos",
                "precio": "1.500",
                "moneda": "UYU",
                "condicion": "usado",
                "foto_principal": "https://cdn.example.com/mesa.jpg"
            }]
        }"#;

        let request: ImportListingsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.rows.len(), 1);
        assert_eq!(request.rows[0].titulo.as_deref(), Some("Mesa"));
        assert_eq!(request.rows[0].zona.as_deref(), Some("Pocitos"));
    }
}
