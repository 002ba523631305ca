use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Data, Request};

/// Candidate token captured from the request body, stashed in the request's
/// local cache for the [`AuthUser`](crate::auth::AuthUser) guard.
#[derive(Debug, Default)]
pub struct BodyToken(pub Option<String>);

/// Request fairing that captures a `token` field from JSON bodies.
///
/// Request guards cannot read the body, so this runs ahead of routing and
/// peeks the data stream. The peek is capped at Rocket's 512-byte buffer;
/// payloads in this API are far smaller, and a token that cannot be read
/// here can still arrive via query parameter or `x-access-token` header.
pub struct TokenExtractor;

#[rocket::async_trait]
impl Fairing for TokenExtractor {
    fn info(&self) -> Info {
        Info {
            name: "Body Token Extractor",
            kind: Kind::Request,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, data: &mut Data<'_>) {
        let is_json = request.content_type().is_some_and(|ct| ct.is_json());
        let token = if is_json {
            let bytes = data.peek(512).await;
            token_field(bytes)
        } else {
            None
        };
        request.local_cache(|| BodyToken(token));
    }
}

fn token_field(bytes: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    value
        .get("token")
        .and_then(|token| token.as_str())
        .map(str::to_string)
}
