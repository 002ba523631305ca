use chrono::{DateTime, Utc};
use rocket_db_pools::sqlx::FromRow;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ===== Roles =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Unknown role strings degrade to the least-privileged role.
    pub fn from_str(role: &str) -> Self {
        match role {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

// ===== User =====

/// A persisted user record as returned by the API.
///
/// The `password` field carries the stored (hashed) form, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub phone: Option<String>,
    pub token: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ===== Content items =====

/// An announcement or comment. The two resources are structurally identical:
/// short content text, an immutable author reference, and a liker set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: i32,
    pub content: String,
    pub author_id: i32,
    pub likes: Vec<i32>,
    pub created_at: DateTime<Utc>,
}
