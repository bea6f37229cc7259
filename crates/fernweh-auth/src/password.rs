//! Password hashing and reset-token generation.
//!
//! Hashing uses Argon2id with default parameters, an OsRng salt and PHC
//! string output. Reset tokens are random values stored as their SHA-256
//! digest so a leaked store never exposes a usable token.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};

/// How long a generated reset token stays redeemable.
pub const RESET_TOKEN_TTL: Duration = Duration::minutes(15);

/// Hashes a plaintext password for storage.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if hashing fails (rare).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verifies a plaintext password against a stored PHC hash.
///
/// `Ok(false)` on mismatch; `Err` only if the stored hash is malformed.
pub fn verify_password(
    password: &str,
    hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Generates a password-reset token.
///
/// Returns `(plaintext, stored_digest, expiry)`: the plaintext goes to
/// the user, the hex SHA-256 digest and expiry are persisted on the
/// account record.
#[must_use]
pub fn generate_reset_token() -> (String, String, OffsetDateTime) {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    let plaintext = hex::encode(bytes);
    let digest = hex::encode(Sha256::digest(plaintext.as_bytes()));
    (plaintext, digest, OffsetDateTime::now_utc() + RESET_TOKEN_TTL)
}
