//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PROFILE_IMAGE_URL: &str = "/images/default.svg";

/// A registered user.
///
/// `password_hash` and `salt` are written together, and only by the two
/// password-write operations (registration and password change). Every other
/// persistence path leaves them untouched, so a record is never rehashed as a
/// side effect of being saved.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    /// Unique, compared exactly as stored (case-sensitive).
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub profile_image_url: String,
    pub role: String, // USER, ADMIN
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.to_uppercase().as_str() {
            "ADMIN" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::User => "USER".to_string(),
            Role::Admin => "ADMIN".to_string(),
        }
    }
}

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub profile_image_url: Option<String>,
}

/// Sign-in request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Change password request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// User response (without credential material)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub profile_image_url: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            profile_image_url: user.profile_image_url,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
