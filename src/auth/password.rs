// Password hashing and verification

use crate::auth::error::AuthError;
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

/// Password service wrapping Argon2id.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with a freshly generated salt.
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    /// Verify a password against a stored hash. Returns `Ok(false)` on a
    /// mismatch; only a malformed stored hash is an error.
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Err(AuthError::PasswordHash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = PasswordService::hash_password("kiai-1234").unwrap();
        assert!(PasswordService::verify_password("kiai-1234", &hash).unwrap());
    }

    #[test]
    fn wrong_password_fails_without_error() {
        let hash = PasswordService::hash_password("kiai-1234").unwrap();
        assert!(!PasswordService::verify_password("kiai-12345", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = PasswordService::hash_password("same-password").unwrap();
        let b = PasswordService::hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(matches!(
            PasswordService::verify_password("x", "not-a-phc-string"),
            Err(AuthError::PasswordHash)
        ));
    }
}
