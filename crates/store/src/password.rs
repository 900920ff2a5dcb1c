//! Salted password hashing for employee credentials.
//!
//! Stored format is `salt$hexdigest` where digest = SHA-256(password ++ salt).
//! Production: swap for a memory-hard KDF (argon2) behind the same two
//! functions.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt: String = {
        let mut rng = rand::thread_rng();
        (0..16).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
    };
    format!("{salt}${}", digest(password, &salt))
}

/// Constant-shape verify against a stored `salt$hexdigest` value.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(password, salt) == expected,
        None => false,
    }
}

fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "no-dollar-sign"));
        assert!(!verify_password("anything", ""));
    }
}
