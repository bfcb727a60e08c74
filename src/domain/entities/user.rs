//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// User role enum matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Account status enum matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
    Deleted,
}

impl UserStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "suspended" => Self::Suspended,
            "deleted" => Self::Deleted,
            _ => Self::Active,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a marketplace user account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - display_name: VARCHAR(60) NULL
/// - phone: VARCHAR(30) NULL
/// - role: VARCHAR(20) DEFAULT 'user'
/// - status: VARCHAR(20) DEFAULT 'active'
/// - tenant_id: BIGINT NULL REFERENCES tenants(id) ON DELETE SET NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Email address (unique, login identifier)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name shown on publications
    pub display_name: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Role (user or admin)
    #[serde(default)]
    pub role: UserRole,

    /// Account status
    #[serde(default)]
    pub status: UserStatus,

    /// Real-estate agency the user publishes for, if any
    pub tenant_id: Option<i64>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account can log in and publish.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Check if the user has the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Get the user's display name, falling back to the email local part.
    pub fn display_name_or_email(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            email: String::new(),
            password_hash: String::new(),
            display_name: None,
            phone: None,
            role: UserRole::default(),
            status: UserStatus::default(),
            tenant_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Admin user listing query.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Case-insensitive match against email or display name
    pub search: Option<String>,
    /// Filter by status
    pub status: Option<UserStatus>,
    pub limit: i64,
    pub offset: i64,
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Create a new user in the database.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Update profile fields of an existing user.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Hard delete a user by ID (admin cleanup).
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Update the account status (suspend/restore).
    async fn update_status(&self, id: i64, status: UserStatus) -> Result<(), AppError>;

    /// List users for the admin panel.
    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, AppError>;

    /// Count users matching an admin query.
    async fn count(&self, query: &UserQuery) -> Result<i64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn create_test_user() -> User {
        User {
            id: 12345678901234567,
            email: "vendor@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            ..Default::default()
        }
    }

    #[test_case("user", UserRole::User)]
    #[test_case("admin", UserRole::Admin ; "lowercase admin")]
    #[test_case("ADMIN", UserRole::Admin ; "uppercase admin")]
    #[test_case("unknown", UserRole::User)]
    fn test_user_role_from_str(input: &str, expected: UserRole) {
        assert_eq!(UserRole::from_str(input), expected);
    }

    #[test_case("active", UserStatus::Active)]
    #[test_case("suspended", UserStatus::Suspended)]
    #[test_case("DELETED", UserStatus::Deleted)]
    #[test_case("", UserStatus::Active)]
    fn test_user_status_from_str(input: &str, expected: UserStatus) {
        assert_eq!(UserStatus::from_str(input), expected);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [UserStatus::Active, UserStatus::Suspended, UserStatus::Deleted] {
            assert_eq!(UserStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_is_active_only_for_active_status() {
        let mut user = create_test_user();
        assert!(user.is_active());

        user.status = UserStatus::Suspended;
        assert!(!user.is_active());

        user.status = UserStatus::Deleted;
        assert!(!user.is_active());
    }

    #[test]
    fn test_is_admin() {
        let mut user = create_test_user();
        assert!(!user.is_admin());

        user.role = UserRole::Admin;
        assert!(user.is_admin());
    }

    #[test]
    fn test_display_name_falls_back_to_email_local_part() {
        let mut user = create_test_user();
        assert_eq!(user.display_name_or_email(), "vendor");

        user.display_name = Some("Ferretería El Tornillo".to_string());
        assert_eq!(user.display_name_or_email(), "Ferretería El Tornillo");

        user.display_name = Some(String::new());
        assert_eq!(user.display_name_or_email(), "vendor");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = create_test_user();
        let serialized = serde_json::to_string(&user).expect("Failed to serialize user");

        assert!(!serialized.contains("password_hash"));
        assert!(!serialized.contains("hashed_password"));
    }
}
