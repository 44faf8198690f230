//! Credential database handle.
//!
//! Every failure leaving this module is already mapped to
//! [`AuthError::StoreUnavailable`] and logged once.

use std::collections::HashSet;

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::{seaql_migrations, MigratorTrait};

use domain::{AuthError, AuthResult};

use super::migrations::Migrator;

/// One schema migration and whether it has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

/// Open connection to the credential database
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the database and bring the schema up to date.
    pub async fn connect(database_url: &str) -> AuthResult<Self> {
        let db = Self::connect_without_migrations(database_url).await?;
        db.run_migrations().await?;
        tracing::info!("Credential database ready");
        Ok(db)
    }

    /// Open the database as-is, for schema management commands.
    pub async fn connect_without_migrations(database_url: &str) -> AuthResult<Self> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        // Statement logging would echo password hashes
        options.sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await.map_err(store_error)?;
        Ok(Self { connection })
    }

    /// Hand the connection pool to a repository.
    pub fn into_connection(self) -> DatabaseConnection {
        self.connection
    }

    pub async fn run_migrations(&self) -> AuthResult<()> {
        Migrator::up(&self.connection, None)
            .await
            .map_err(store_error)
    }

    /// Roll back the most recent migration.
    pub async fn rollback_migration(&self) -> AuthResult<()> {
        Migrator::down(&self.connection, Some(1))
            .await
            .map_err(store_error)
    }

    /// Drop every table, then reapply all migrations.
    pub async fn fresh_migrations(&self) -> AuthResult<()> {
        Migrator::fresh(&self.connection)
            .await
            .map_err(store_error)
    }

    /// Known migrations in order, with their applied state.
    pub async fn migration_status(&self) -> AuthResult<Vec<MigrationState>> {
        // The tracking table does not exist until the first migration runs
        let applied: HashSet<String> = match seaql_migrations::Entity::find()
            .all(&self.connection)
            .await
        {
            Ok(rows) => rows.into_iter().map(|m| m.version).collect(),
            Err(DbErr::Query(_)) | Err(DbErr::Exec(_)) => HashSet::new(),
            Err(e) => return Err(store_error(e)),
        };

        Ok(Migrator::migrations()
            .iter()
            .map(|m| MigrationState {
                name: m.name().to_string(),
                applied: applied.contains(m.name()),
            })
            .collect())
    }
}

/// Map a database error to the store-unavailable kind.
pub(crate) fn store_error(err: DbErr) -> AuthError {
    tracing::error!(error = %err, "Credential store error");
    AuthError::store_unavailable(err.to_string())
}
