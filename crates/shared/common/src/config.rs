//! Shared configuration structures.
//!
//! Values come from the process environment (after loading `.env`), with
//! defaults taken from `domain::constants`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use domain::{
    DEFAULT_DATABASE_URL, DEFAULT_LOCKOUT_SECONDS, DEFAULT_MAX_FAILED_ATTEMPTS,
    DEFAULT_MIN_PASSWORD_LENGTH, MAX_LOCKOUT_SECONDS,
};

/// Credential store configuration.
#[derive(Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// sea-orm connection URL
    pub database_url: String,
    /// Minimum accepted password length at registration
    pub min_password_length: usize,
}

// The URL may embed credentials for non-SQLite backends
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("database_url", &"[REDACTED]")
            .field("min_password_length", &self.min_password_length)
            .finish()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

/// Failed-login throttling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThrottleConfig {
    /// Consecutive failures before lockout (0 disables throttling)
    pub max_failed_attempts: u32,
    /// Lockout duration in seconds, capped at `MAX_LOCKOUT_SECONDS`
    pub lockout_seconds: u64,
}

impl ThrottleConfig {
    pub fn is_enabled(&self) -> bool {
        self.max_failed_attempts > 0
    }

    pub fn lockout(&self) -> Duration {
        Duration::from_secs(self.lockout_seconds.min(MAX_LOCKOUT_SECONDS))
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            lockout_seconds: DEFAULT_LOCKOUT_SECONDS,
        }
    }
}

/// Inference collaborator configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InferenceConfig {
    /// Shell command that scores a JSON health record from stdin
    pub model_command: Option<String>,
    /// Pre-rendered model performance report shown on the Metrics page
    pub metrics_report_path: Option<PathBuf>,
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub throttle: ThrottleConfig,
    pub inference: InferenceConfig,
}

impl AppConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = StoreConfig {
            database_url: non_empty(&lookup, "DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            min_password_length: parsed(&lookup, "MIN_PASSWORD_LENGTH")
                .unwrap_or(DEFAULT_MIN_PASSWORD_LENGTH),
        };

        let throttle = ThrottleConfig {
            max_failed_attempts: parsed(&lookup, "LOGIN_MAX_FAILED_ATTEMPTS")
                .unwrap_or(DEFAULT_MAX_FAILED_ATTEMPTS),
            lockout_seconds: parsed(&lookup, "LOGIN_LOCKOUT_SECONDS")
                .map(capped_lockout)
                .unwrap_or(DEFAULT_LOCKOUT_SECONDS),
        };

        let inference = InferenceConfig {
            model_command: non_empty(&lookup, "MODEL_COMMAND"),
            metrics_report_path: non_empty(&lookup, "METRICS_REPORT_PATH").map(PathBuf::from),
        };

        Self {
            store,
            throttle,
            inference,
        }
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn capped_lockout(seconds: u64) -> u64 {
    if seconds > MAX_LOCKOUT_SECONDS {
        tracing::warn!(
            seconds,
            max = MAX_LOCKOUT_SECONDS,
            "LOGIN_LOCKOUT_SECONDS too large, capping"
        );
        return MAX_LOCKOUT_SECONDS;
    }
    seconds
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = non_empty(lookup, key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, "Ignoring unparseable configuration value");
            None
        }
    }
}
