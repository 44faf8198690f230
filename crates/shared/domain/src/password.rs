//! Password value object - hashing and verification.
//!
//! All Argon2 configuration lives here. Plain text passwords never leave
//! this module in any form other than a salted PHC hash string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::constants::DEFAULT_MIN_PASSWORD_LENGTH;
use crate::error::{AuthError, AuthResult};

/// Hash verified when the username is unknown, so the failure path costs
/// the same as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| Password::hash("heartwise-timing-equaliser").ok());

/// Hashed password value object.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password, rejecting only the empty password.
    pub fn new(plain_text: &str) -> AuthResult<Self> {
        Self::with_min_length(plain_text, DEFAULT_MIN_PASSWORD_LENGTH)
    }

    /// Hash a plain text password that must be at least `min_length`
    /// characters long. A `min_length` of zero still rejects empty input.
    pub fn with_min_length(plain_text: &str, min_length: usize) -> AuthResult<Self> {
        if plain_text.is_empty() {
            return Err(AuthError::invalid_input("Password must not be empty"));
        }
        if plain_text.chars().count() < min_length {
            return Err(AuthError::invalid_input(format!(
                "Password must be at least {} characters",
                min_length
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from storage).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
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
    /// Returns an error only when the stored hash is not a valid PHC string.
    pub fn verify(&self, plain_text: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(&self.hash)
            .map_err(|e| AuthError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    /// Burn one verification against a fixed hash. Always returns false.
    pub fn verify_dummy(plain_text: &str) -> bool {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            if let Ok(parsed) = PasswordHash::new(hash) {
                let _ = Self::argon2().verify_password(plain_text.as_bytes(), &parsed);
            }
        }
        false
    }

    fn hash(plain_text: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AuthError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}
