//! Credential verification.
//!
//! Digests are Argon2id PHC strings (`$argon2id$v=19$...`), salted per call.
//! Verification goes through `PasswordVerifier`, which compares in constant time.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// One-way hashing of login secrets
#[derive(Clone)]
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
    /// Digest of a throwaway secret, verified against when no user matched
    decoy_digest: String,
}

impl CredentialVerifier {
    pub fn new() -> Result<Self, PasswordError> {
        let argon2 = Argon2::default();
        let salt = SaltString::generate(&mut OsRng);
        let decoy_digest = argon2
            .hash_password(b"decoy-credential", &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?
            .to_string();

        Ok(Self { argon2, decoy_digest })
    }

    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// True iff `secret` matches `digest`. An unparseable digest is a mismatch.
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password digest is not a valid PHC string: {}", e);
                false
            }
        }
    }

    /// Burns the same work as a real verification and always fails.
    pub fn verify_decoy(&self, secret: &str) {
        let _ = self.verify(secret, &self.decoy_digest);
    }
}
