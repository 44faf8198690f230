//! Credential database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{AuthError, Credential, Username};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "credentials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain record
impl TryFrom<Model> for Credential {
    type Error = AuthError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let username = Username::parse(model.username)
            .map_err(|e| AuthError::store_unavailable(format!("Corrupt credential row: {}", e)))?;

        Ok(Credential {
            username,
            password_hash: model.password_hash,
            created_at: model.created_at,
        })
    }
}
