use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::{Request, Response};
use serde::Serialize;
use std::io::Cursor;

use crate::auth::AuthError;

#[derive(Debug)]
pub enum ApiError {
    DatabaseError(sqlx::Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let (status, error_type, message) = match self {
            ApiError::DatabaseError(e) => {
                log::error!("database error: {}", e);
                (Status::InternalServerError, "DatabaseError", e.to_string())
            }
            ApiError::NotFound(msg) => {
                log::debug!("not found: {}", msg);
                (Status::NotFound, "NotFound", msg)
            }
            ApiError::BadRequest(msg) => {
                log::debug!("bad request: {}", msg);
                (Status::BadRequest, "BadRequest", msg)
            }
            ApiError::Conflict(msg) => {
                log::debug!("conflict: {}", msg);
                (Status::Conflict, "Conflict", msg)
            }
            ApiError::Unauthorized(msg) => {
                log::debug!("unauthorized: {}", msg);
                (Status::Unauthorized, "Unauthorized", msg)
            }
            ApiError::Forbidden(msg) => {
                log::debug!("forbidden: {}", msg);
                (Status::Forbidden, "Forbidden", msg)
            }
            ApiError::InternalError(msg) => {
                log::error!("internal error: {}", msg);
                (Status::InternalServerError, "InternalError", msg)
            }
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        let json = serde_json::to_string(&error_response).unwrap_or_else(|_| {
            r#"{"error":"SerializationError","message":"Failed to serialize error"}"#.to_string()
        });

        Response::build()
            .status(status)
            .header(rocket::http::ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

impl rocket_okapi::response::OpenApiResponderInner for ApiError {
    fn responses(
        _gen: &mut rocket_okapi::r#gen::OpenApiGenerator,
    ) -> rocket_okapi::Result<okapi::openapi3::Responses> {
        use okapi::openapi3::{RefOr, Response as OpenApiResponse, Responses};

        let mut responses = Responses::default();
        for code in [400, 401, 403, 404, 409, 500] {
            responses.responses.insert(
                code.to_string(),
                RefOr::Object(OpenApiResponse::default()),
            );
        }
        Ok(responses)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::Conflict("Duplicate value for a unique field".to_string())
            }
            _ => ApiError::DatabaseError(err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err.status().code {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::InternalError(message),
        }
    }
}

// Catchers render failures that never reach a handler (guard rejections,
// unroutable paths, unparsable bodies) as the same JSON error shape.

fn catcher_body(error: &str, message: &str) -> rocket::serde::json::Json<serde_json::Value> {
    rocket::serde::json::Json(serde_json::json!({
        "error": error,
        "message": message,
    }))
}

#[catch(400)]
fn bad_request() -> rocket::serde::json::Json<serde_json::Value> {
    catcher_body("BadRequest", "Bad request")
}

#[catch(401)]
fn unauthorized() -> rocket::serde::json::Json<serde_json::Value> {
    catcher_body("Unauthorized", "Invalid token, cannot verify token authenticity")
}

#[catch(403)]
fn forbidden() -> rocket::serde::json::Json<serde_json::Value> {
    catcher_body("Forbidden", "A token is required for authentication")
}

#[catch(404)]
fn not_found() -> rocket::serde::json::Json<serde_json::Value> {
    catcher_body("NotFound", "Resource not found")
}

#[catch(422)]
fn unprocessable() -> rocket::serde::json::Json<serde_json::Value> {
    catcher_body("BadRequest", "Request body could not be parsed")
}

#[catch(500)]
fn internal_error() -> rocket::serde::json::Json<serde_json::Value> {
    catcher_body("InternalError", "Internal server error")
}

pub fn catchers() -> Vec<rocket::Catcher> {
    catchers![
        bad_request,
        unauthorized,
        forbidden,
        not_found,
        unprocessable,
        internal_error
    ]
}
