//! Password hashing with Argon2

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::AuthError;

/// Hash a plaintext password into a PHC-format string
///
/// A fresh random salt is generated per call, so two hashes of the same
/// password never compare equal.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a plaintext password against a stored PHC-format hash
///
/// Malformed or foreign-scheme hashes verify as `false` rather than
/// erroring, so a corrupted stored hash behaves like a wrong password.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => return Ok(false),
    };

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
