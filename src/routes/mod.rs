//! HTTP route handlers grouped by resource domain.
//!
//! Each submodule corresponds to a logical area of the API and exposes typed
//! Rocket handlers annotated with `#[openapi]` so `rocket_okapi` can derive
//! an OpenAPI document automatically. The `content` module holds the
//! persistence operations shared by announcements and comments.

pub mod announcements;
pub mod comments;
pub mod content;
pub mod health;
pub(crate) mod helpers;
pub mod users;
