//! Password value object.
//!
//! Wraps Argon2 hashing so plain-text passwords never leave this module.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

/// Hashed password.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password after checking its length.
    ///
    /// # Errors
    /// Returns a validation error if the password is outside 6..=100 characters.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let len = plain_text.chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
            return Err(AppError::validation(format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap an existing hash loaded from the database.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::new("hunter22").unwrap();

        assert!(password.verify("hunter22"));
        assert!(!password.verify("hunter23"));
    }

    #[test]
    fn test_password_from_hash() {
        let hash = Password::new("correct horse").unwrap().into_string();
        assert!(Password::from_hash(hash).verify("correct horse"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = Password::new("samepass").unwrap();
        let b = Password::new("samepass").unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_length_bounds() {
        assert!(Password::new("12345").is_err());
        assert!(Password::new("123456").is_ok());
        assert!(Password::new(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!Password::from_hash("not-a-phc-string".into()).verify("anything"));
    }
}
