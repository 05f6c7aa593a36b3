//! Password value object.
//!
//! Holds an Argon2 PHC string. Plain text only exists while a password is
//! being constructed or verified.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::{MIN_PASSWORD_LENGTH, PASSWORD_HASH_PREFIX};
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
    /// Build a password from user input.
    ///
    /// Values already carrying the hash prefix are kept as they are; anything
    /// else must satisfy the password rule and is hashed.
    ///
    /// # Errors
    /// Returns `InvalidPassword` when the plain text is shorter than
    /// `MIN_PASSWORD_LENGTH`, or lacks a lowercase letter or a digit.
    pub fn new(value: &str) -> AppResult<Self> {
        if Self::is_hashed(value) {
            return Ok(Self::from_hash(value.to_string()));
        }

        Self::check_rule(value)?;
        let hash = Self::hash(value)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Whether a raw value is already a stored hash.
    pub fn is_hashed(value: &str) -> bool {
        value.starts_with(PASSWORD_HASH_PREFIX)
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// # Errors
    /// An empty plain text is rejected with `InvalidPassword` rather than
    /// reported as a mismatch. A corrupt stored hash is an internal error.
    pub fn verify(&self, plain_text: &str) -> AppResult<bool> {
        if plain_text.is_empty() {
            return Err(AppError::InvalidPassword(
                "Password must not be empty".to_string(),
            ));
        }
        Self::verify_hash(plain_text, &self.hash)
    }

    fn check_rule(plain_text: &str) -> AppResult<()> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::InvalidPassword(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if !plain_text.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::InvalidPassword(
                "Password must contain a lowercase letter".to_string(),
            ));
        }
        if !plain_text.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::InvalidPassword(
                "Password must contain a digit".to_string(),
            ));
        }
        Ok(())
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "securepassword123";
        let password = Password::new(plain).unwrap();

        assert_ne!(password.as_str(), plain);
        assert!(password.as_str().starts_with(PASSWORD_HASH_PREFIX));
        assert!(password.verify(plain).unwrap());
        assert!(!password.verify("wrongpassword123").unwrap());
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "testpassword1";
        let hash = Password::new(plain).unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain).unwrap());
    }

    #[test]
    fn test_hashed_value_is_not_rehashed() {
        let hashed = Password::new("alreadyhashed1").unwrap().into_string();
        let again = Password::new(&hashed).unwrap();

        assert_eq!(again.as_str(), hashed);
        assert!(again.verify("alreadyhashed1").unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "samepassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain).unwrap());
        assert!(pass2.verify(plain).unwrap());
    }

    #[test]
    fn test_rule_violations() {
        for weak in ["short1a", "NOLOWERCASE123", "nodigitshere", ""] {
            let result = Password::new(weak);
            assert!(
                matches!(result, Err(AppError::InvalidPassword(_))),
                "{weak:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(Password::new("abcdefg1").is_ok());
    }

    #[test]
    fn test_verify_empty_is_error() {
        let password = Password::new("validpass1").unwrap();
        assert!(matches!(
            password.verify(""),
            Err(AppError::InvalidPassword(_))
        ));
    }
}
