use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, post};
use rocket_db_pools::sqlx;
use rocket_okapi::openapi;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::auth::AuthState;
use crate::error::ApiError;
use crate::models::User;
use crate::routes::helpers::{USER_COLUMNS, required, validate_length};

/// Registration payload. Every field is optional at the deserialization
/// layer so that missing fields produce a 400 with a useful message instead
/// of a generic unprocessable-entity failure; presence is enforced in the
/// handler, which requires all of them.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new account and log it in.
#[openapi(tag = "Auth")]
#[post("/auth/register", data = "<payload>")]
pub async fn register(
    state: &State<AuthState>,
    pool: &State<sqlx::PgPool>,
    payload: Json<RegisterRequest>,
) -> Result<status::Custom<Json<RegisterResponse>>, ApiError> {
    let (user, token) = register_user(state, pool, payload.into_inner()).await?;
    Ok(status::Custom(
        Status::Created,
        Json(RegisterResponse { user, token }),
    ))
}

/// Exchange credentials for an identity token.
#[openapi(tag = "Auth")]
#[post("/auth/login", data = "<payload>")]
pub async fn login(
    state: &State<AuthState>,
    pool: &State<sqlx::PgPool>,
    payload: Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty());
    let password = payload
        .password
        .as_deref()
        .filter(|password| !password.is_empty());

    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let user: Option<User> = sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = $1"
    ))
    .bind(&email)
    .fetch_optional(pool.inner())
    .await?;

    let user = user.ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !state
        .password_service
        .verify_password(password, &user.password_hash)
    {
        return Err(ApiError::BadRequest("Invalid Credentials".to_string()));
    }

    let signed = state.jwt_service.issue(user.id, &user.email)?;
    store_current_token(pool.inner(), user.id, &signed.token).await?;

    Ok(Json(TokenResponse {
        token: signed.token,
    }))
}

/// Shared registration flow, also used by the authenticated
/// `POST /api/users` route.
///
/// All mandatory fields are required; a duplicate email is a conflict. The
/// unique index on `lower(email)` backs the pre-check, so a racing duplicate
/// insert still surfaces as a 409.
pub async fn register_user(
    state: &AuthState,
    pool: &sqlx::PgPool,
    payload: RegisterRequest,
) -> Result<(User, String), ApiError> {
    let first_name = required(payload.first_name, "firstName")?;
    let last_name = required(payload.last_name, "lastName")?;
    let email = required(payload.email, "email")?.trim().to_lowercase();
    let password = required(payload.password, "password")?;
    let confirm_password = required(payload.confirm_password, "confirmPassword")?;

    validate_length("firstName", &first_name, 2, 50)?;
    validate_length("lastName", &last_name, 2, 50)?;
    validate_length("email", &email, 5, 255)?;
    validate_length("password", &password, 6, 255)?;

    if password != confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE lower(email) = $1")
        .bind(&email)
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        return Err(ApiError::Conflict(
            "User Already Exist. Please Login".to_string(),
        ));
    }

    let password_hash = state.password_service.hash_password(&password)?;

    let user: User = sqlx::query_as(&format!(
        "INSERT INTO users (first_name, last_name, email, password_hash, phone) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&first_name)
    .bind(&last_name)
    .bind(&email)
    .bind(&password_hash)
    .bind(payload.phone.as_deref())
    .fetch_one(pool)
    .await?;

    let signed = state.jwt_service.issue(user.id, &user.email)?;
    let user = store_current_token(pool, user.id, &signed.token).await?;

    Ok((user, signed.token))
}

/// Record the most recently issued token on the user row. Informational
/// only: token validity is always decided by signature and expiry.
async fn store_current_token(
    pool: &sqlx::PgPool,
    user_id: i32,
    token: &str,
) -> Result<User, ApiError> {
    let user: User = sqlx::query_as(&format!(
        "UPDATE users SET token = $1 WHERE id = $2 RETURNING {USER_COLUMNS}"
    ))
    .bind(token)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(user)
}
