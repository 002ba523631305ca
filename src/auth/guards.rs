use rocket::Request;
use rocket::State;
use rocket::request::{FromRequest, Outcome};
use rocket_okapi::request::OpenApiFromRequest;

use crate::auth::gate::BodyToken;
use crate::auth::{AuthError, AuthResult, AuthState};

/// Identity attached to a request by the authorization gate.
///
/// Holds only what the token proves: id and email. No database lookup
/// happens here, so a user deleted after issuance stays authenticated until
/// the token expires. Role is never carried: handlers that need it re-read
/// the persisted record.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match authenticate(request).await {
            Ok(user) => Outcome::Success(user),
            Err(err) => Outcome::Error((err.status(), err)),
        }
    }
}

async fn authenticate(request: &Request<'_>) -> AuthResult<AuthUser> {
    let token = candidate_token(request).ok_or(AuthError::MissingToken)?;

    let auth_state = request
        .guard::<&State<AuthState>>()
        .await
        .succeeded()
        .ok_or_else(|| AuthError::Config("AuthState missing from state".into()))?;

    let claims = auth_state.jwt_service.decode(&token).map_err(|err| {
        if let AuthError::Jwt(jwt_err) = &err {
            if matches!(
                jwt_err.kind(),
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
            ) {
                return AuthError::TokenExpired;
            }
        }
        AuthError::TokenInvalid
    })?;

    let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::TokenInvalid)?;

    Ok(AuthUser {
        id: user_id,
        email: claims.email,
    })
}

/// Candidate token locations in priority order: JSON body field, query
/// parameter, custom header. First present value wins.
fn candidate_token(request: &Request<'_>) -> Option<String> {
    let body = request.local_cache(|| BodyToken(None));
    if let Some(token) = &body.0 {
        return Some(token.clone());
    }

    if let Some(Ok(token)) = request.query_value::<String>("token") {
        return Some(token);
    }

    request
        .headers()
        .get_one("x-access-token")
        .map(str::to_string)
}
