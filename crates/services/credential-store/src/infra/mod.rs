//! Infrastructure layer - database connection and schema migrations.

mod db;
pub mod migrations;

pub(crate) use db::store_error;
pub use db::{Database, MigrationState};
pub use migrations::Migrator;
