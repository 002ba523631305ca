use rocket::http::Status;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("A token is required for authentication")]
    MissingToken,
    #[error("token expired")]
    TokenExpired,
    #[error("Invalid token, cannot verify token authenticity")]
    TokenInvalid,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("argon2 parameter error: {0}")]
    Argon2(String),
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl AuthError {
    pub fn status(&self) -> Status {
        match self {
            // An absent token is a 403; a token that fails validation is a 401.
            AuthError::MissingToken => Status::Forbidden,
            AuthError::TokenExpired | AuthError::TokenInvalid => Status::Unauthorized,
            AuthError::Config(_)
            | AuthError::Jwt(_)
            | AuthError::Argon2(_)
            | AuthError::PasswordHash(_) => Status::InternalServerError,
        }
    }
}

impl From<argon2::Error> for AuthError {
    fn from(err: argon2::Error) -> Self {
        AuthError::Argon2(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::PasswordHash(err.to_string())
    }
}
