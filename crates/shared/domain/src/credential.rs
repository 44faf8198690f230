//! Credential record and username value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_USERNAME_LENGTH;
use crate::error::{AuthError, AuthResult};

/// Validated, case-sensitive username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate a raw username.
    ///
    /// The value is kept exactly as given; blank input counts as empty.
    pub fn parse(raw: impl Into<String>) -> AuthResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AuthError::invalid_input("Username must not be empty"));
        }
        if raw.chars().count() > MAX_USERNAME_LENGTH {
            return Err(AuthError::invalid_input(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LENGTH
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = AuthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::parse(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted association of a username with a password hash.
///
/// Immutable once created.
#[derive(Clone, Serialize)]
pub struct Credential {
    pub username: Username,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Credential {
    /// Create a new record stamped with the current time
    pub fn new(username: Username, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_case_sensitive() {
        let lower = Username::parse("alice").unwrap();
        let upper = Username::parse("Alice").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_blank_username_rejected() {
        assert!(matches!(Username::parse(""), Err(AuthError::InvalidInput(_))));
        assert!(matches!(Username::parse("   "), Err(AuthError::InvalidInput(_))));
    }

    #[test]
    fn test_username_length_limit() {
        let max = "a".repeat(MAX_USERNAME_LENGTH);
        assert!(Username::parse(max).is_ok());

        let too_long = "a".repeat(MAX_USERNAME_LENGTH + 1);
        assert!(Username::parse(too_long).is_err());
    }

    #[test]
    fn test_credential_serialization_skips_hash() {
        let credential = Credential::new(Username::parse("bob").unwrap(), "$argon2id$x".into());
        let json = serde_json::to_string(&credential).unwrap();

        assert!(json.contains("\"bob\""));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_username_deserialization_validates() {
        let ok: Result<Username, _> = serde_json::from_str("\"dan\"");
        assert!(ok.is_ok());

        let blank: Result<Username, _> = serde_json::from_str("\"\"");
        assert!(blank.is_err());
    }
}
