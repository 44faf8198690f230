//! Domain layer - Core entities and value objects for the HeartWise gate.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Credential handling, page identities and the inference contract types are
//! shared by the credential store, the session gate and the console.

pub mod constants;
pub mod credential;
pub mod error;
pub mod health;
pub mod page;
pub mod password;

pub use constants::*;
pub use credential::{Credential, Username};
pub use error::{AuthError, AuthResult};
pub use health::{Gender, HealthRecord, RiskLevel, RiskOutcome};
pub use page::{Access, Page, UnknownPage, PUBLIC_PAGES};
pub use password::Password;
