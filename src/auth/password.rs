// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! Password hashing and comparison.
//!
//! Passwords are stored only as salted argon2 hashes in PHC string format.
//! Plaintext never leaves the signup/signin handlers.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::AuthError;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::InternalError(format!("failed to hash password: {e}")))
}

/// Compare a plaintext password against a stored hash.
///
/// A stored hash that fails to parse is treated as a mismatch; the caller
/// sees the same rejection as a wrong password.
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
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("abcd1234").unwrap();
        assert!(verify_password("abcd1234", &hash));
        assert!(!verify_password("abcd1235", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("abcd1234").unwrap();
        let second = hash_password("abcd1234").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn corrupt_stored_hash_is_a_mismatch() {
        assert!(!verify_password("abcd1234", "not-a-phc-string"));
        assert!(!verify_password("abcd1234", ""));
    }
}
