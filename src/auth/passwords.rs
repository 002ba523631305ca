use argon2::{
    Algorithm, Argon2, ParamsBuilder, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::RngCore;

use crate::auth::{AuthError, AuthResult};

const SALT_LEN: usize = 16;

/// Salted, adaptive one-way password hashing with fixed cost parameters.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new() -> AuthResult<Self> {
        let mut builder = ParamsBuilder::new();
        builder.m_cost(19 * 1024); // 19 MiB
        builder.t_cost(2);
        builder.p_cost(1);
        let params = builder.build().map_err(AuthError::from)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        Ok(Self { argon2 })
    }

    /// Hashing failure is fatal to the request that triggered it.
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(AuthError::from)?;
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(AuthError::from)?
            .to_string();
        Ok(hash)
    }

    /// Never fails: a mismatch and a malformed stored form both verify as
    /// false. The comparison itself is constant-time inside argon2.
    pub fn verify_password(&self, password: &str, encoded: &str) -> bool {
        match PasswordHash::new(encoded) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_verifies_passwords() {
        let service = PasswordService::new().expect("password service");
        let hash = service.hash_password("super-secret").expect("hash");

        assert_ne!(hash, "super-secret");
        assert!(service.verify_password("super-secret", &hash));
        assert!(!service.verify_password("wrong-password", &hash));
    }

    #[test]
    fn verify_tolerates_malformed_stored_form() {
        let service = PasswordService::new().expect("password service");
        assert!(!service.verify_password("anything", "not-a-phc-string"));
        assert!(!service.verify_password("anything", ""));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let service = PasswordService::new().expect("password service");
        let first = service.hash_password("secret1").expect("hash");
        let second = service.hash_password("secret1").expect("hash");
        assert_ne!(first, second);
        assert!(service.verify_password("secret1", &first));
        assert!(service.verify_password("secret1", &second));
    }
}
