//! Process-local credential repository.
//!
//! Records live only as long as the repository; used for ephemeral
//! sessions and tests.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::CredentialRepository;
use domain::{AuthError, AuthResult, Credential, Username};

#[derive(Default)]
pub struct MemoryCredentialRepository {
    records: Mutex<HashMap<Username, Credential>>,
}

impl MemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for MemoryCredentialRepository {
    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<Credential>> {
        Ok(self.records.lock().get(username).cloned())
    }

    async fn insert(&self, credential: Credential) -> AuthResult<()> {
        match self.records.lock().entry(credential.username.clone()) {
            Entry::Occupied(_) => Err(AuthError::UsernameTaken),
            Entry::Vacant(slot) => {
                slot.insert(credential);
                Ok(())
            }
        }
    }

    async fn count(&self) -> AuthResult<u64> {
        Ok(self.records.lock().len() as u64)
    }
}
