//! Failed-login throttling.
//!
//! Disabled unless `max_failed_attempts` is non-zero. Counts consecutive
//! credential failures within one session; once the limit is reached,
//! further attempts are refused until the lockout elapses.

use std::time::Duration;

use tokio::time::Instant;

use common::ThrottleConfig;
use domain::{AuthError, AuthResult, MAX_LOCKOUT_SECONDS};

#[derive(Debug)]
pub struct LoginThrottle {
    config: ThrottleConfig,
    failures: u32,
    locked_until: Option<Instant>,
}

impl LoginThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            failures: 0,
            locked_until: None,
        }
    }

    /// Refuse the attempt while locked out.
    pub fn check(&mut self) -> AuthResult<()> {
        let Some(until) = self.locked_until else {
            return Ok(());
        };

        let now = Instant::now();
        if now >= until {
            self.locked_until = None;
            return Ok(());
        }

        let remaining = until - now;
        // Round up so callers never see "retry in 0s" while still locked
        let retry_after_secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        Err(AuthError::TooManyAttempts { retry_after_secs })
    }

    pub fn record_failure(&mut self) {
        if !self.config.is_enabled() {
            return;
        }

        self.failures += 1;
        if self.failures >= self.config.max_failed_attempts {
            tracing::warn!(
                failures = self.failures,
                lockout_seconds = self.config.lockout_seconds,
                "Login locked after repeated failures"
            );
            self.failures = 0;
            let now = Instant::now();
            self.locked_until = Some(
                now.checked_add(self.config.lockout())
                    .unwrap_or_else(|| now + Duration::from_secs(MAX_LOCKOUT_SECONDS)),
            );
        }
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
        self.locked_until = None;
    }

    /// Consecutive failures since the last success or lockout
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}
