use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use rocket_db_pools::sqlx;
use rocket_okapi::openapi;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::auth::policy::{Relation, permits};
use crate::auth::routes::{RegisterRequest, RegisterResponse, register_user};
use crate::auth::{AuthState, AuthUser};
use crate::error::ApiError;
use crate::models::{Role, User};
use crate::routes::helpers::{USER_COLUMNS, load_user, required, validate_length};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub old_password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteUserResponse {
    pub message: String,
    pub user: User,
}

/// List all users. Public.
#[openapi(tag = "Users")]
#[get("/users")]
pub async fn list_users(pool: &State<sqlx::PgPool>) -> Result<Json<Vec<User>>, ApiError> {
    let users: Vec<User> = sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC"
    ))
    .fetch_all(pool.inner())
    .await?;
    Ok(Json(users))
}

/// Get one user by id. Public.
#[openapi(tag = "Users")]
#[get("/users/<id>")]
pub async fn get_user(id: i32, pool: &State<sqlx::PgPool>) -> Result<Json<User>, ApiError> {
    Ok(Json(load_user(pool.inner(), id).await?))
}

/// Get the authenticated caller's own record.
#[openapi(tag = "Users")]
#[get("/users/me")]
pub async fn get_me(user: AuthUser, pool: &State<sqlx::PgPool>) -> Result<Json<User>, ApiError> {
    Ok(Json(load_user(pool.inner(), user.id).await?))
}

/// Create a user. Authenticated duplicate of the registration path.
#[openapi(tag = "Users")]
#[post("/users", data = "<payload>")]
pub async fn create_user(
    _user: AuthUser,
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

/// Update the caller's own profile. Absent fields keep their current value.
#[openapi(tag = "Users")]
#[put("/users/update-profile", data = "<payload>")]
pub async fn update_profile(
    user: AuthUser,
    pool: &State<sqlx::PgPool>,
    payload: Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let payload = payload.into_inner();
    let current = load_user(pool.inner(), user.id).await?;

    let first_name = payload.first_name.unwrap_or(current.first_name);
    let last_name = payload.last_name.unwrap_or(current.last_name);
    let phone = payload.phone.or(current.phone);
    let email = payload
        .email
        .map(|email| email.trim().to_lowercase())
        .unwrap_or(current.email);

    validate_length("firstName", &first_name, 2, 50)?;
    validate_length("lastName", &last_name, 2, 50)?;
    validate_length("email", &email, 5, 255)?;

    // A duplicate email trips the unique index and maps to a 409.
    let updated: User = sqlx::query_as(&format!(
        "UPDATE users SET first_name = $1, last_name = $2, phone = $3, email = $4 \
         WHERE id = $5 RETURNING {USER_COLUMNS}"
    ))
    .bind(&first_name)
    .bind(&last_name)
    .bind(phone.as_deref())
    .bind(&email)
    .bind(user.id)
    .fetch_one(pool.inner())
    .await?;

    Ok(Json(updated))
}

/// Change the caller's own password. Requires the current password.
#[openapi(tag = "Users")]
#[put("/users/update-password", data = "<payload>")]
pub async fn update_password(
    user: AuthUser,
    state: &State<AuthState>,
    pool: &State<sqlx::PgPool>,
    payload: Json<UpdatePasswordRequest>,
) -> Result<Json<User>, ApiError> {
    let payload = payload.into_inner();
    let password = required(payload.password, "password")?;
    let confirm_password = required(payload.confirm_password, "confirmPassword")?;
    let old_password = required(payload.old_password, "oldPassword")?;

    let current = load_user(pool.inner(), user.id).await?;

    if password != confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }

    if !state
        .password_service
        .verify_password(&old_password, &current.password_hash)
    {
        return Err(ApiError::BadRequest(
            "Old Password is incorrect".to_string(),
        ));
    }

    validate_length("password", &password, 6, 255)?;

    let password_hash = state.password_service.hash_password(&password)?;
    let updated: User = sqlx::query_as(&format!(
        "UPDATE users SET password_hash = $1 WHERE id = $2 RETURNING {USER_COLUMNS}"
    ))
    .bind(&password_hash)
    .bind(user.id)
    .fetch_one(pool.inner())
    .await?;

    Ok(Json(updated))
}

/// Delete a user: self-service, or any user when the requester is an admin.
/// The requester's role comes from their persisted record, not the token.
#[openapi(tag = "Users")]
#[delete("/users/<user_to_delete>")]
pub async fn delete_user(
    user: AuthUser,
    user_to_delete: i32,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    let requester = load_user(pool.inner(), user.id)
        .await
        .map_err(|_| ApiError::NotFound("User Connected Not Found".to_string()))?;

    let role = Role::from_str(&requester.role);
    if !permits(Relation::SelfOrAdmin, user.id, role, user_to_delete) {
        return Err(ApiError::Unauthorized(
            "You are not authorized to delete this user".to_string(),
        ));
    }

    let target = load_user(pool.inner(), user_to_delete)
        .await
        .map_err(|_| ApiError::NotFound("User To Delete Not Found".to_string()))?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_to_delete)
        .execute(pool.inner())
        .await?;

    Ok(Json(DeleteUserResponse {
        message: "User Deleted".to_string(),
        user: target,
    }))
}
