//! Shared helper functions for route handlers.

use rocket_db_pools::sqlx::{self, PgPool};

use crate::error::ApiError;
use crate::models::User;

/// Column list for `users` queries, matching the field order of
/// [`User`](crate::models::User).
pub const USER_COLUMNS: &str =
    "id, role, first_name, last_name, email, password_hash, phone, token, created_at";

/// Load a user by id, or 404.
pub async fn load_user(pool: &PgPool, user_id: i32) -> Result<User, ApiError> {
    let user: Option<User> =
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    user.ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Unwrap a mandatory request field or reject with a 400 naming it.
pub fn required<T>(field: Option<T>, name: &str) -> Result<T, ApiError> {
    field.ok_or_else(|| ApiError::BadRequest(format!("Missing required field '{name}'")))
}

/// Enforce the character-length bounds the data model declares per field.
pub fn validate_length(name: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::BadRequest(format!(
            "Field '{name}' must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_length_enforces_bounds() {
        assert!(validate_length("content", "hi", 2, 140).is_ok());
        assert!(validate_length("content", "x", 2, 140).is_err());
        assert!(validate_length("content", &"x".repeat(140), 2, 140).is_ok());
        assert!(validate_length("content", &"x".repeat(141), 2, 140).is_err());
    }

    #[test]
    fn validate_length_counts_characters_not_bytes() {
        // Four characters, more than four bytes.
        assert!(validate_length("name", "héllo", 2, 5).is_ok());
    }

    #[test]
    fn required_rejects_missing_fields() {
        assert!(required(Some("x"), "field").is_ok());
        assert!(required::<&str>(None, "field").is_err());
    }
}
