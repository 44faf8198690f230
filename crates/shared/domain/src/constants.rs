//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Credentials
// =============================================================================

/// Maximum username length in characters
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Default minimum password length. Only the empty password is rejected.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 1;

// =============================================================================
// Login throttling
// =============================================================================

/// Consecutive failed logins before lockout (0 = throttling disabled)
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 0;

/// Lockout duration once the failure limit is reached
pub const DEFAULT_LOCKOUT_SECONDS: u64 = 60;

/// Longest lockout the throttle will apply (one day)
pub const MAX_LOCKOUT_SECONDS: u64 = 86_400;

// =============================================================================
// Storage
// =============================================================================

/// Default credential database (created on first use)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://heartwise.db?mode=rwc";

// =============================================================================
// Inference
// =============================================================================

/// Probability at or above which a prediction is reported as high risk
pub const HIGH_RISK_THRESHOLD: f32 = 0.5;
