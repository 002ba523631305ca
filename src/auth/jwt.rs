use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::auth::{AuthConfig, AuthResult};

/// Claims embedded in an identity token. Identity and expiry only: role is
/// deliberately absent, since it can change after issuance and is re-read
/// from storage wherever it matters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl JwtService {
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        let secret_bytes = config.jwt_secret.as_bytes();
        let encoding_key = EncodingKey::from_secret(secret_bytes);
        let decoding_key = DecodingKey::from_secret(secret_bytes);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            token_ttl: Duration::hours(config.token_ttl_hours),
        })
    }

    pub fn issue(&self, user_id: i32, email: &str) -> AuthResult<SignedToken> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(SignedToken { token, expires_at })
    }

    /// Verify signature and expiry. Any failure (bad signature, expired,
    /// malformed) surfaces as an error; the gate treats them all as an
    /// invalid token.
    pub fn decode(&self, token: &str) -> AuthResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;

    const TEST_JWT_SECRET: &str = "super-secret-test-key";

    fn make_test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: TEST_JWT_SECRET.into(),
            token_ttl_hours: 24,
        }
    }

    #[test]
    fn issues_and_decodes_tokens() {
        let service = JwtService::from_config(&make_test_config()).expect("jwt service");

        let token = service.issue(42, "user@example.com").expect("issue token");
        let claims = service.decode(&token.token).expect("decode token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "user@example.com");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp, token.expires_at.timestamp());
    }

    #[test]
    fn rejects_expired_tokens() {
        let service = JwtService::from_config(&make_test_config()).expect("jwt service");

        // Forge a token whose expiry is already in the past, signed with the
        // same secret.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "42".into(),
            email: "user@example.com".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .expect("encode");

        assert!(service.decode(&token).is_err());
    }

    #[test]
    fn rejects_tokens_signed_with_another_key() {
        let service = JwtService::from_config(&make_test_config()).expect("jwt service");
        let other = JwtService::from_config(&AuthConfig {
            jwt_secret: "a-different-secret".into(),
            token_ttl_hours: 24,
        })
        .expect("jwt service");

        let token = other.issue(7, "intruder@example.com").expect("issue token");
        assert!(service.decode(&token.token).is_err());
    }

    #[test]
    fn rejects_malformed_tokens() {
        let service = JwtService::from_config(&make_test_config()).expect("jwt service");
        assert!(service.decode("not-a-jwt").is_err());
    }
}
