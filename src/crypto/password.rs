//! Password hashing
//!
//! Argon2id with a fresh random salt per hash. Digests are PHC strings, so
//! the salt and parameters travel with the hash and verification needs no
//! extra state. Verification uses the algorithm's own constant-time
//! comparison; the plaintext is never reconstructed.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;

use crate::error::CryptoError;

/// Adaptive one-way hasher for credentials at rest.
#[derive(Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Hasher with the library's default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Two calls on the same password produce different digests.
    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| CryptoError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only when the digest itself is
    /// not a valid PHC string.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, CryptoError> {
        let parsed = PasswordHash::new(digest).map_err(|_| CryptoError::MalformedDigest)?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let digest = hasher.hash("correct horse battery staple").unwrap();

        assert!(hasher.verify("correct horse battery staple", &digest).unwrap());
        assert!(!hasher.verify("incorrect", &digest).unwrap());
    }

    #[test]
    fn test_salts_are_fresh() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash("hunter2").unwrap();
        let second = hasher.hash("hunter2").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("hunter2", &first).unwrap());
        assert!(hasher.verify("hunter2", &second).unwrap());
    }

    #[test]
    fn test_digest_is_phc_encoded() {
        let hasher = PasswordHasher::new();
        let digest = hasher.hash("pw").unwrap();
        assert!(digest.starts_with("$argon2id$"));
    }

    #[test]
    fn test_malformed_digest_rejected() {
        let hasher = PasswordHasher::new();
        assert!(matches!(
            hasher.verify("pw", "not-a-digest"),
            Err(CryptoError::MalformedDigest)
        ));
    }
}
