//! Password hashing and verification.
//!
//! Passwords are stored as `hex(HMAC-SHA256(key = salt, msg = password))`
//! with a fresh 16-byte random salt generated on every password write. The
//! plaintext is never retained and never logged. Verification recomputes the
//! digest and compares it in constant time.

use crate::error::AppError;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Salt length in raw bytes; hex-encoded the stored salt is always
/// `2 * SALT_LEN` characters.
const SALT_LEN: usize = 16;

/// Salt and digest produced by a single password write.
#[derive(Debug, Clone)]
pub struct SaltedHash {
    pub salt: String,
    pub hash: String,
}

pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a password under a freshly generated salt.
    ///
    /// Callers invoke this only when a password is set or changed; re-saving
    /// a user record without a password change must not come through here.
    pub fn hash(&self, password: &str) -> Result<SaltedHash, AppError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);

        let hash = self.digest(&salt, password)?;

        Ok(SaltedHash { salt, hash })
    }

    /// Verify a password against a stored salt and digest.
    ///
    /// Comparison happens inside `Mac::verify_slice`, which is constant-time.
    /// Any mismatch, including an undecodable stored digest, surfaces as
    /// `InvalidCredentials`.
    pub fn verify(&self, password: &str, salt: &str, stored_hash: &str) -> Result<(), AppError> {
        let expected = hex::decode(stored_hash).map_err(|_| AppError::InvalidCredentials)?;

        let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
            .map_err(|e| AppError::Internal(format!("Failed to key password HMAC: {}", e)))?;
        mac.update(password.as_bytes());

        mac.verify_slice(&expected)
            .map_err(|_| AppError::InvalidCredentials)
    }

    fn digest(&self, salt: &str, password: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
            .map_err(|e| AppError::Internal(format!("Failed to key password HMAC: {}", e)))?;
        mac.update(password.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
