//! Repository layer for credential persistence.

pub mod entities;
mod credential_repository;
mod memory;

pub use credential_repository::{CredentialRepository, SqlCredentialRepository};
pub use memory::MemoryCredentialRepository;

#[cfg(any(test, feature = "test-utils"))]
pub use credential_repository::MockCredentialRepository;
