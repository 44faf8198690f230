//! Credential repository backed by SeaORM.

use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, DatabaseConnection, EntityTrait, PaginatorTrait, Set, SqlErr,
};

use super::entities::credential::{self, ActiveModel, Entity as CredentialEntity};
use crate::infra::store_error;
use domain::{AuthError, AuthResult, Credential, Username};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Credential repository trait for dependency injection.
///
/// Records are insert-only: there is no update or delete.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Find the record for an exact (case-sensitive) username
    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<Credential>>;

    /// Insert a record if no record exists for its username.
    ///
    /// Fails with `UsernameTaken` when the username is already present. The
    /// check and the insert are a single atomic step.
    async fn insert(&self, credential: Credential) -> AuthResult<()>;

    /// Number of stored records
    async fn count(&self) -> AuthResult<u64>;
}

/// SQL implementation of CredentialRepository
pub struct SqlCredentialRepository {
    db: DatabaseConnection,
}

impl SqlCredentialRepository {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for SqlCredentialRepository {
    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<Credential>> {
        let result = CredentialEntity::find_by_id(username.as_str().to_owned())
            .one(&self.db)
            .await
            .map_err(store_error)?;

        result.map(Credential::try_from).transpose()
    }

    async fn insert(&self, credential: Credential) -> AuthResult<()> {
        let active_model = ActiveModel {
            username: Set(credential.username.into_string()),
            password_hash: Set(credential.password_hash),
            created_at: Set(credential.created_at),
        };

        let inserted = CredentialEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(credential::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match inserted {
            Ok(0) => Err(AuthError::UsernameTaken),
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AuthError::UsernameTaken)
            }
            Err(e) => Err(store_error(e)),
        }
    }

    async fn count(&self) -> AuthResult<u64> {
        CredentialEntity::find()
            .count(&self.db)
            .await
            .map_err(store_error)
    }
}
