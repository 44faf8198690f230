//! Inference collaborator contract.
//!
//! The trained classifier is external; the gate only checks access before
//! handing it a [`HealthRecord`].

use async_trait::async_trait;
use thiserror::Error;

use domain::{HealthRecord, Page, RiskOutcome};

/// Access to a protected page was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Please login to access the {0} page.")]
pub struct AccessDenied(pub Page);

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    /// The model could not be reached or failed while scoring
    #[error("Inference backend failed: {0}")]
    Backend(String),

    /// The model answered with something that is not a risk outcome
    #[error("Malformed inference output: {0}")]
    Malformed(String),
}

/// Pretrained scoring function.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, features: &HealthRecord) -> Result<RiskOutcome, InferenceError>;
}
