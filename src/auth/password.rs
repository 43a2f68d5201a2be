//! Argon2id password hashing.

use anyhow::{Context, Result};
use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::rngs::OsRng;

/// Hashes a password into a PHC string carrying its own salt and parameters.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

/// Hash of a random throwaway password. Logins for unknown emails verify against
/// it so they cost the same Argon2 work as a wrong password.
pub fn decoy_hash() -> Result<String> {
    let throwaway = SaltString::generate(&mut OsRng);
    hash_password(throwaway.as_str())
}

/// `false` for a wrong password and for a malformed stored hash alike.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Runs the hash on the blocking pool; argon2 is deliberately slow.
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task panicked")?
}

pub async fn verify_password_blocking(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .context("password verification task panicked")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn decoy_hash_is_a_real_argon2_hash() {
        let decoy = decoy_hash().unwrap();

        assert!(decoy.starts_with("$argon2id$"));
        assert!(PasswordHash::new(&decoy).is_ok());
        assert!(!verify_password("secret123", &decoy));
        assert!(!verify_password("", &decoy));
    }

    #[tokio::test]
    async fn blocking_helpers_agree() {
        let hash = hash_password_blocking("secret".to_string()).await.unwrap();
        assert!(verify_password_blocking("secret".to_string(), hash).await.unwrap());
    }
}
