// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use darkgpt_core::DarkgptError;
use ring::rand::{SecureRandom, SystemRandom};

/// Hashes `password` with a fresh 16-byte salt. Returns a PHC string.
pub fn hash_password(password: &str) -> Result<String, DarkgptError> {
    let mut salt = [0u8; 16];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| DarkgptError::Internal("failed to generate password salt".into()))?;
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| DarkgptError::Internal(format!("invalid password salt: {e}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DarkgptError::Internal(format!("password hashing failed: {e}")))
}

/// Checks `password` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn salts_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify_password("x", "not-a-phc-string"));
    }
}
