use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use rocket_db_pools::sqlx;
use rocket_okapi::openapi;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::auth::policy::{Relation, permits};
use crate::error::ApiError;
use crate::models::{ContentItem, Role};
use crate::routes::content::{self, ContentKind};
use crate::routes::helpers::{load_user, required, validate_length};

const KIND: ContentKind = ContentKind::Announcement;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditAnnouncementRequest {
    pub new_content: Option<String>,
    pub announcement_id: Option<i32>,
}

/// List all announcements, newest first. Public.
#[openapi(tag = "Announcements")]
#[get("/announcements")]
pub async fn list_announcements(
    pool: &State<sqlx::PgPool>,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
    Ok(Json(content::list(pool.inner(), KIND).await?))
}

/// Get one announcement by id. Public.
#[openapi(tag = "Announcements")]
#[get("/announcements/<id>")]
pub async fn get_announcement(
    id: i32,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<ContentItem>, ApiError> {
    Ok(Json(content::fetch(pool.inner(), KIND, id).await?))
}

/// Post a new announcement as the authenticated user.
#[openapi(tag = "Announcements")]
#[post("/announcements", data = "<payload>")]
pub async fn create_announcement(
    user: AuthUser,
    pool: &State<sqlx::PgPool>,
    payload: Json<CreateAnnouncementRequest>,
) -> Result<status::Custom<Json<ContentItem>>, ApiError> {
    let text = required(payload.into_inner().content, "content")?;
    validate_length("content", &text, 2, 140)?;

    let item = content::create(pool.inner(), KIND, user.id, &text).await?;
    Ok(status::Custom(Status::Created, Json(item)))
}

/// Edit an announcement's content. Author only; admins get no override here.
#[openapi(tag = "Announcements")]
#[put("/announcements/update-announcement", data = "<payload>")]
pub async fn edit_announcement(
    user: AuthUser,
    pool: &State<sqlx::PgPool>,
    payload: Json<EditAnnouncementRequest>,
) -> Result<Json<ContentItem>, ApiError> {
    let payload = payload.into_inner();
    let new_content = required(payload.new_content, "newContent")?;
    let announcement_id = required(payload.announcement_id, "announcementId")?;
    validate_length("content", &new_content, 2, 140)?;

    let item = content::fetch(pool.inner(), KIND, announcement_id).await?;

    // Role plays no part in edit authorization.
    if !permits(Relation::Author, user.id, Role::User, item.author_id) {
        return Err(ApiError::Unauthorized(
            "You are not the author of this announcement".to_string(),
        ));
    }

    Ok(Json(
        content::update(pool.inner(), KIND, announcement_id, &new_content).await?,
    ))
}

/// Toggle the requester's like on an announcement.
#[openapi(tag = "Announcements")]
#[post("/announcements/<id>/like")]
pub async fn like_announcement(
    user: AuthUser,
    id: i32,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<ContentItem>, ApiError> {
    Ok(Json(
        content::toggle_like(pool.inner(), KIND, id, user.id).await?,
    ))
}

/// Delete an announcement. Author or admin; the role is re-read from the
/// requester's persisted record, not taken from the token.
#[openapi(tag = "Announcements")]
#[delete("/announcements/<id>")]
pub async fn delete_announcement(
    user: AuthUser,
    id: i32,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<ContentItem>, ApiError> {
    let item = content::fetch(pool.inner(), KIND, id).await?;
    let requester = load_user(pool.inner(), user.id).await?;

    let role = Role::from_str(&requester.role);
    if !permits(Relation::AuthorOrAdmin, user.id, role, item.author_id) {
        return Err(ApiError::Unauthorized(
            "You are not the author of this announcement nor an admin".to_string(),
        ));
    }

    content::delete(pool.inner(), KIND, id).await?;
    Ok(Json(item))
}
