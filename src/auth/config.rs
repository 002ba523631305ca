use crate::auth::{AuthError, AuthResult};

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

// `chrono::Duration::hours` panics past roughly 2^53 hours; cap well below
// that. Anything longer than a year is a configuration mistake anyway.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Authentication configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    /// Load from the environment. `BULLETIN_JWT_SECRET` is required and must
    /// be non-empty; a missing or out-of-range `BULLETIN_TOKEN_TTL_HOURS`
    /// falls back to 24 hours.
    pub fn from_env() -> AuthResult<Self> {
        let jwt_secret = std::env::var("BULLETIN_JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| AuthError::Config("BULLETIN_JWT_SECRET is required".into()))?;

        Ok(Self {
            jwt_secret,
            token_ttl_hours: token_ttl_hours(std::env::var("BULLETIN_TOKEN_TTL_HOURS").ok()),
        })
    }
}

fn token_ttl_hours(raw: Option<String>) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
        .unwrap_or(DEFAULT_TOKEN_TTL_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_in_range_is_kept() {
        assert_eq!(token_ttl_hours(Some("1".into())), 1);
        assert_eq!(token_ttl_hours(Some("72".into())), 72);
        assert_eq!(token_ttl_hours(Some(MAX_TOKEN_TTL_HOURS.to_string())), MAX_TOKEN_TTL_HOURS);
    }

    #[test]
    fn ttl_out_of_range_falls_back_to_default() {
        assert_eq!(token_ttl_hours(None), DEFAULT_TOKEN_TTL_HOURS);
        assert_eq!(token_ttl_hours(Some("0".into())), DEFAULT_TOKEN_TTL_HOURS);
        assert_eq!(token_ttl_hours(Some("-5".into())), DEFAULT_TOKEN_TTL_HOURS);
        assert_eq!(token_ttl_hours(Some("not-a-number".into())), DEFAULT_TOKEN_TTL_HOURS);
        // Large enough to overflow a chrono Duration if taken at face value.
        assert_eq!(
            token_ttl_hours(Some("9000000000000000".into())),
            DEFAULT_TOKEN_TTL_HOURS
        );
    }
}
