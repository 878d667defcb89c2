//! Salted password hashing
//!
//! Stored format is `<salt-hex>$<sha256-hex>` where the digest covers
//! the salt hex concatenated with the plain password.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Hash a plain password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::thread_rng().gen();
    let salt_hex = hex::encode(salt);
    let digest = digest_hex(&salt_hex, password);
    format!("{}${}", salt_hex, digest)
}

/// Verify a plain password against a stored `salt$digest` value.
/// Malformed stored values simply fail verification.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt_hex, digest)) => digest_hex(salt_hex, password) == digest,
        None => false,
    }
}

fn digest_hex(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
