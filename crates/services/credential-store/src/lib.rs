//! Credential Store Library
//!
//! Durable, uniqueness-enforcing username registry and password verifier.
//! Records are persisted through SeaORM (SQLite by default) or kept in a
//! process-local map for ephemeral sessions.

pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::StoreConfig;
use domain::AuthResult;

pub use crate::infra::{Database, MigrationState};
pub use crate::repository::{
    CredentialRepository, MemoryCredentialRepository, SqlCredentialRepository,
};
pub use crate::service::{CredentialService, CredentialStore};

/// Open the SQL-backed credential store, applying pending migrations.
pub async fn open_sql_store(
    config: &StoreConfig,
) -> AuthResult<CredentialStore<SqlCredentialRepository>> {
    let db = Database::connect(&config.database_url).await?;

    let repo = Arc::new(SqlCredentialRepository::new(db.into_connection()));
    Ok(CredentialStore::new(repo).with_min_password_length(config.min_password_length))
}

/// Create a store that lives only as long as the process.
pub fn open_memory_store(config: &StoreConfig) -> CredentialStore<MemoryCredentialRepository> {
    CredentialStore::new(Arc::new(MemoryCredentialRepository::new()))
        .with_min_password_length(config.min_password_length)
}

/// Apply a schema management command, printing the status listing for
/// [`MigrateAction::Status`].
pub async fn run_migrations(config: &StoreConfig, action: MigrateAction) -> AuthResult<()> {
    let db = Database::connect_without_migrations(&config.database_url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for migration in status {
                let marker = if migration.applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, migration.name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
