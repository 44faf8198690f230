//! Credential service layer.

mod credential_service;

pub use credential_service::{CredentialService, CredentialStore};

#[cfg(any(test, feature = "test-utils"))]
pub use credential_service::MockCredentialService;
