//! Argon2id password hashing.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::error::DomainError;

/// Hash `password` into a PHC string with a fresh random salt.
///
/// # Errors
/// Returns `DomainError::PasswordHash` if the salt or hash cannot be produced.
pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| DomainError::password_hash(format!("failed to encode salt: {e}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::password_hash(e.to_string()))
}

/// Check `candidate` against a stored PHC hash.
///
/// # Errors
/// Returns `DomainError::PasswordHash` if the stored hash cannot be parsed.
pub fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool, DomainError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| DomainError::password_hash(format!("stored hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}
