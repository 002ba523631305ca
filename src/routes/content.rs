//! Shared persistence operations for the two content resources.
//!
//! Announcements and comments are structurally identical, so the handlers in
//! `routes::announcements` and `routes::comments` delegate here, selecting
//! their tables through [`ContentKind`]. Table names are static strings, so
//! the `format!`-built SQL never interpolates user input.

use rocket_db_pools::sqlx::{self, PgPool};

use crate::error::ApiError;
use crate::models::ContentItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Announcement,
    Comment,
}

impl ContentKind {
    fn table(self) -> &'static str {
        match self {
            ContentKind::Announcement => "announcements",
            ContentKind::Comment => "comments",
        }
    }

    fn likes_table(self) -> &'static str {
        match self {
            ContentKind::Announcement => "announcement_likes",
            ContentKind::Comment => "comment_likes",
        }
    }

    fn likes_fk(self) -> &'static str {
        match self {
            ContentKind::Announcement => "announcement_id",
            ContentKind::Comment => "comment_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Announcement => "Announcement",
            ContentKind::Comment => "Comment",
        }
    }
}

fn select_sql(kind: ContentKind, filter: &str) -> String {
    format!(
        "SELECT c.id, c.content, c.author_id, c.created_at, \
         coalesce(array_agg(l.user_id) FILTER (WHERE l.user_id IS NOT NULL), ARRAY[]::integer[]) AS likes \
         FROM {table} c LEFT JOIN {likes} l ON l.{fk} = c.id \
         {filter} \
         GROUP BY c.id \
         ORDER BY c.created_at DESC, c.id DESC",
        table = kind.table(),
        likes = kind.likes_table(),
        fk = kind.likes_fk(),
        filter = filter,
    )
}

pub async fn list(pool: &PgPool, kind: ContentKind) -> Result<Vec<ContentItem>, ApiError> {
    let items: Vec<ContentItem> = sqlx::query_as(&select_sql(kind, ""))
        .fetch_all(pool)
        .await?;
    Ok(items)
}

/// Load one item with its liker set, or 404.
pub async fn fetch(pool: &PgPool, kind: ContentKind, id: i32) -> Result<ContentItem, ApiError> {
    let item: Option<ContentItem> = sqlx::query_as(&select_sql(kind, "WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    item.ok_or_else(|| ApiError::NotFound(format!("{} not found", kind.label())))
}

pub async fn create(
    pool: &PgPool,
    kind: ContentKind,
    author_id: i32,
    content: &str,
) -> Result<ContentItem, ApiError> {
    let item: ContentItem = sqlx::query_as(&format!(
        "INSERT INTO {table} (content, author_id) VALUES ($1, $2) \
         RETURNING id, content, author_id, created_at, ARRAY[]::integer[] AS likes",
        table = kind.table(),
    ))
    .bind(content)
    .bind(author_id)
    .fetch_one(pool)
    .await?;
    Ok(item)
}

pub async fn update(
    pool: &PgPool,
    kind: ContentKind,
    id: i32,
    new_content: &str,
) -> Result<ContentItem, ApiError> {
    sqlx::query(&format!(
        "UPDATE {table} SET content = $1 WHERE id = $2",
        table = kind.table(),
    ))
    .bind(new_content)
    .bind(id)
    .execute(pool)
    .await?;

    fetch(pool, kind, id).await
}

pub async fn delete(pool: &PgPool, kind: ContentKind, id: i32) -> Result<(), ApiError> {
    sqlx::query(&format!(
        "DELETE FROM {table} WHERE id = $1",
        table = kind.table(),
    ))
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Toggle the requester's membership in the item's liker set.
///
/// The mutation targets single rows in the likes table rather than rewriting
/// the whole record, so concurrent toggles by different users cannot lose
/// each other's updates. Two consecutive toggles by the same user are
/// net-neutral.
pub async fn toggle_like(
    pool: &PgPool,
    kind: ContentKind,
    id: i32,
    user_id: i32,
) -> Result<ContentItem, ApiError> {
    // 404 before mutating anything.
    fetch(pool, kind, id).await?;

    let removed = sqlx::query(&format!(
        "DELETE FROM {likes} WHERE {fk} = $1 AND user_id = $2",
        likes = kind.likes_table(),
        fk = kind.likes_fk(),
    ))
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if removed.rows_affected() == 0 {
        sqlx::query(&format!(
            "INSERT INTO {likes} ({fk}, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            likes = kind.likes_table(),
            fk = kind.likes_fk(),
        ))
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    }

    fetch(pool, kind, id).await
}
