use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use std::sync::LazyLock;

use crate::error::{Result, StorageError};

/// Hash checked when a login names no account, so both paths pay for one
/// Argon2 run.
static DECOY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("pitchside-decoy-password").ok());

/// Hashes a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StorageError::Password(e.to_string()))
}

/// Returns `Ok(false)` on a mismatch; an unparsable stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| StorageError::Password(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Burns one password verification that always fails.
pub fn verify_decoy(password: &str) -> bool {
    match DECOY_HASH.as_deref() {
        Some(decoy) => {
            let _ = verify_password(password, decoy);
        }
        None => {
            let _ = hash_password(password);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_against_original_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = hash_password("repeated-secret").unwrap();
        let second = hash_password("repeated-secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn decoy_never_matches() {
        assert!(DECOY_HASH.as_deref().is_some_and(|h| h.starts_with("$argon2id$")));
        assert!(!verify_decoy("pitchside-decoy-password"));
        assert!(!verify_decoy("anything else"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
