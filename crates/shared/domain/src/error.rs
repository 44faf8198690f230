//! Authentication errors.
//!
//! Every failure the credential store or the session gate can report.
//! All variants are recoverable; callers map them to user-facing messages
//! through [`AuthError::user_message`].

use thiserror::Error;

/// Authentication error taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Registration attempted with a username that already has a record
    #[error("Username already exists")]
    UsernameTaken,

    /// Unknown username or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Backing store could not be read or written
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    /// Empty or malformed username/password
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Login throttled after repeated failures
    #[error("Too many failed attempts, retry in {retry_after_secs}s")]
    TooManyAttempts { retry_after_secs: u64 },

    /// Password hashing failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UsernameTaken => "USERNAME_TAKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::PasswordMismatch => "PASSWORD_MISMATCH",
            AuthError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AuthError::InvalidInput(_) => "INVALID_INPUT",
            AuthError::TooManyAttempts { .. } => "TOO_MANY_ATTEMPTS",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// User-facing message (hides storage and hashing details).
    pub fn user_message(&self) -> String {
        match self {
            AuthError::UsernameTaken => {
                "Username already exists. Try a different one.".to_string()
            }
            AuthError::InvalidCredentials => "Invalid username or password.".to_string(),
            AuthError::PasswordMismatch => "Passwords do not match!".to_string(),
            AuthError::InvalidInput(msg) => msg.clone(),
            AuthError::TooManyAttempts { retry_after_secs } => format!(
                "Too many failed login attempts. Try again in {} seconds.",
                retry_after_secs
            ),
            AuthError::StoreUnavailable(_) => {
                "The credential store is unavailable. Please try again later.".to_string()
            }
            AuthError::Internal(_) => "An internal error occurred.".to_string(),
        }
    }

    /// Whether the error counts as a failed login attempt for throttling.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials)
    }

    pub fn store_unavailable(detail: impl Into<String>) -> Self {
        AuthError::StoreUnavailable(detail.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AuthError::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AuthError::Internal(msg.into())
    }
}

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
