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

const KIND: ContentKind = ContentKind::Comment;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditCommentRequest {
    pub new_content: Option<String>,
    pub comment_id: Option<i32>,
}

/// List all comments, newest first. Public.
#[openapi(tag = "Comments")]
#[get("/comments")]
pub async fn list_comments(pool: &State<sqlx::PgPool>) -> Result<Json<Vec<ContentItem>>, ApiError> {
    Ok(Json(content::list(pool.inner(), KIND).await?))
}

/// Get one comment by id. Public.
#[openapi(tag = "Comments")]
#[get("/comments/<id>")]
pub async fn get_comment(
    id: i32,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<ContentItem>, ApiError> {
    Ok(Json(content::fetch(pool.inner(), KIND, id).await?))
}

/// Post a new comment as the authenticated user.
#[openapi(tag = "Comments")]
#[post("/comments", data = "<payload>")]
pub async fn create_comment(
    user: AuthUser,
    pool: &State<sqlx::PgPool>,
    payload: Json<CreateCommentRequest>,
) -> Result<status::Custom<Json<ContentItem>>, ApiError> {
    let text = required(payload.into_inner().content, "content")?;
    validate_length("content", &text, 2, 140)?;

    let item = content::create(pool.inner(), KIND, user.id, &text).await?;
    Ok(status::Custom(Status::Created, Json(item)))
}

/// Edit a comment's content. Author only; admins get no override here.
#[openapi(tag = "Comments")]
#[put("/comments/update-comment", data = "<payload>")]
pub async fn edit_comment(
    user: AuthUser,
    pool: &State<sqlx::PgPool>,
    payload: Json<EditCommentRequest>,
) -> Result<Json<ContentItem>, ApiError> {
    let payload = payload.into_inner();
    let new_content = required(payload.new_content, "newContent")?;
    let comment_id = required(payload.comment_id, "commentId")?;
    validate_length("content", &new_content, 2, 140)?;

    let item = content::fetch(pool.inner(), KIND, comment_id).await?;

    if !permits(Relation::Author, user.id, Role::User, item.author_id) {
        return Err(ApiError::Unauthorized(
            "You are not the author of this comment".to_string(),
        ));
    }

    Ok(Json(
        content::update(pool.inner(), KIND, comment_id, &new_content).await?,
    ))
}

/// Toggle the requester's like on a comment.
#[openapi(tag = "Comments")]
#[post("/comments/<id>/like")]
pub async fn like_comment(
    user: AuthUser,
    id: i32,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<ContentItem>, ApiError> {
    Ok(Json(
        content::toggle_like(pool.inner(), KIND, id, user.id).await?,
    ))
}

/// Delete a comment. Author or admin, with the role re-read from storage.
#[openapi(tag = "Comments")]
#[delete("/comments/<id>")]
pub async fn delete_comment(
    user: AuthUser,
    id: i32,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<ContentItem>, ApiError> {
    let item = content::fetch(pool.inner(), KIND, id).await?;
    let requester = load_user(pool.inner(), user.id).await?;

    let role = Role::from_str(&requester.role);
    if !permits(Relation::AuthorOrAdmin, user.id, role, item.author_id) {
        return Err(ApiError::Unauthorized(
            "You are not the author of this comment nor an admin".to_string(),
        ));
    }

    content::delete(pool.inner(), KIND, id).await?;
    Ok(Json(item))
}
