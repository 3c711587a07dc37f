//! Models for user accounts and the authentication payloads they exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of a student account.
pub struct User {
    /// Unique identifier for the user.
    pub id: Uuid,
    /// Institutional registration number, stored uppercased (unique).
    pub reg_number: String,
    /// Student email, stored lowercased (unique).
    pub email: String,
    /// Argon2 hash of the user's password. Never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Constructs a new user with a freshly generated id, normalizing the
    /// unique fields so uniqueness is case-insensitive.
    pub fn new(reg_number: &str, email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            reg_number: reg_number.trim().to_uppercase(),
            email: email.trim().to_lowercase(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
/// Payload submitted when creating an account.
pub struct SignupRequest {
    pub reg_number: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Credentials submitted by a user attempting to authenticate.
/// The identifier is a registration number or a student email.
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: Uuid,
    pub reg_number: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            reg_number: user.reg_number,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Returned after a successful signup or login.
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
}
