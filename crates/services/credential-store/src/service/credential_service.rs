//! Credential service - registration and verification.
//!
//! Validates input, hashes passwords off the async executor and delegates
//! persistence to a [`CredentialRepository`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::repository::CredentialRepository;
use domain::{
    AuthError, AuthResult, Credential, Password, Username, DEFAULT_MIN_PASSWORD_LENGTH,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Credential service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Register a new credential record.
    ///
    /// The record is durable when this returns `Ok`.
    async fn register(&self, username: &str, password: &str) -> AuthResult<Username>;

    /// Verify a login attempt, returning the authenticated identity.
    ///
    /// Unknown usernames and wrong passwords both yield `InvalidCredentials`.
    async fn verify(&self, username: &str, password: &str) -> AuthResult<Username>;

    /// Check whether a username is registered
    async fn contains(&self, username: &str) -> AuthResult<bool>;
}

/// Concrete implementation of CredentialService over a repository.
pub struct CredentialStore<R: CredentialRepository> {
    repo: Arc<R>,
    min_password_length: usize,
}

impl<R: CredentialRepository> CredentialStore<R> {
    /// Create new credential store with the default password policy
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }

    /// Override the minimum password length accepted at registration
    pub fn with_min_password_length(mut self, min_password_length: usize) -> Self {
        self.min_password_length = min_password_length;
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }
}

#[async_trait]
impl<R: CredentialRepository + 'static> CredentialService for CredentialStore<R> {
    async fn register(&self, username: &str, password: &str) -> AuthResult<Username> {
        let username = Username::parse(username)?;

        if self.repo.find_by_username(&username).await?.is_some() {
            tracing::info!(username = %username, "Registration rejected: username taken");
            return Err(AuthError::UsernameTaken);
        }

        let plain = password.to_owned();
        let min_length = self.min_password_length;
        let password_hash = blocking(move || Password::with_min_length(&plain, min_length))
            .await?
            .into_string();

        // The repository insert is atomic; a concurrent registration that
        // slipped past the check above still fails here.
        self.repo
            .insert(Credential::new(username.clone(), password_hash))
            .await?;

        tracing::info!(username = %username, "Registered new credential");
        Ok(username)
    }

    async fn verify(&self, username: &str, password: &str) -> AuthResult<Username> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::invalid_input(
                "Username and password must not be empty",
            ));
        }

        let plain = password.to_owned();

        let record = match Username::parse(username) {
            Ok(username) => self.repo.find_by_username(&username).await?,
            Err(_) => None,
        };

        let Some(record) = record else {
            blocking(move || Ok(Password::verify_dummy(&plain))).await?;
            tracing::debug!("Verification failed");
            return Err(AuthError::InvalidCredentials);
        };

        let stored = Password::from_hash(record.password_hash);
        let matched = blocking(move || Ok(stored.verify(&plain))).await?;

        match matched {
            Ok(true) => Ok(record.username),
            Ok(false) => {
                tracing::debug!("Verification failed");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                tracing::warn!(
                    username = %record.username,
                    error = %e,
                    "Stored password hash is unreadable; treating as mismatch"
                );
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn contains(&self, username: &str) -> AuthResult<bool> {
        match Username::parse(username) {
            Ok(username) => Ok(self.repo.find_by_username(&username).await?.is_some()),
            Err(_) => Ok(false),
        }
    }
}

/// Run CPU-bound Argon2 work on the blocking pool.
async fn blocking<T, F>(f: F) -> AuthResult<T>
where
    F: FnOnce() -> AuthResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::internal(format!("Hashing task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MemoryCredentialRepository, MockCredentialRepository};

    fn memory_store() -> CredentialStore<MemoryCredentialRepository> {
        CredentialStore::new(Arc::new(MemoryCredentialRepository::new()))
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let store = memory_store();

        let registered = store.register("bob", "secret").await.unwrap();
        assert_eq!(registered.as_str(), "bob");

        let verified = store.verify("bob", "secret").await.unwrap();
        assert_eq!(verified, registered);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_regardless_of_password() {
        let store = memory_store();

        assert!(store.register("alice", "pw1").await.is_ok());
        assert_eq!(
            store.register("alice", "pw2").await,
            Err(AuthError::UsernameTaken)
        );
        assert_eq!(
            store.register("alice", "pw1").await,
            Err(AuthError::UsernameTaken)
        );

        // The first password still wins
        assert!(store.verify("alice", "pw1").await.is_ok());
        assert_eq!(
            store.verify("alice", "pw2").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_one_character_change_is_rejected() {
        let store = memory_store();
        store.register("erin", "hunter2").await.unwrap();

        for attempt in ["hunter3", "Hunter2", "hunter", "hunter22", "hunter2 "] {
            assert_eq!(
                store.verify("erin", attempt).await,
                Err(AuthError::InvalidCredentials),
                "attempt {:?} should fail",
                attempt
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let store = memory_store();
        store.register("bob", "secret").await.unwrap();

        let unknown = store.verify("carol", "x").await.unwrap_err();
        let wrong = store.verify("bob", "x").await.unwrap_err();

        assert_eq!(unknown, wrong);
        assert_eq!(unknown.user_message(), wrong.user_message());
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let store = memory_store();

        assert!(matches!(
            store.register("", "pw").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            store.register("dan", "").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            store.verify("", "pw").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            store.verify("dan", "").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(!store.contains("dan").await.unwrap());
    }

    #[tokio::test]
    async fn test_minimum_password_length_applies_to_registration_only() {
        let store = memory_store().with_min_password_length(8);

        assert!(matches!(
            store.register("frank", "short").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(store.register("frank", "long-enough").await.is_ok());
    }

    #[tokio::test]
    async fn test_overlong_username_fails_verification_as_invalid_credentials() {
        let store = memory_store();
        let name = "z".repeat(domain::MAX_USERNAME_LENGTH + 1);

        assert_eq!(
            store.verify(&name, "pw").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_unreadable_hash_is_a_mismatch() {
        let mut repo = MockCredentialRepository::new();
        repo.expect_find_by_username().returning(|username| {
            Ok(Some(Credential::new(username.clone(), "garbage".to_string())))
        });

        let store = CredentialStore::new(Arc::new(repo));
        assert_eq!(
            store.verify("gina", "pw").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_not_masked() {
        let mut repo = MockCredentialRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Err(AuthError::store_unavailable("disk I/O error")));

        let store = CredentialStore::new(Arc::new(repo));

        assert!(matches!(
            store.verify("bob", "secret").await,
            Err(AuthError::StoreUnavailable(_))
        ));
        assert!(matches!(
            store.register("bob", "secret").await,
            Err(AuthError::StoreUnavailable(_))
        ));
        assert!(matches!(
            store.contains("bob").await,
            Err(AuthError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_race_surfaces_username_taken() {
        let mut repo = MockCredentialRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(AuthError::UsernameTaken));

        let store = CredentialStore::new(Arc::new(repo));
        assert_eq!(
            store.register("hal", "pw").await,
            Err(AuthError::UsernameTaken)
        );
    }

    #[tokio::test]
    async fn test_stored_hash_never_contains_plain_text() {
        let repo = Arc::new(MemoryCredentialRepository::new());
        let store = CredentialStore::new(repo.clone());
        store.register("ivy", "plaintext-pw").await.unwrap();

        let record = repo
            .find_by_username(&Username::parse("ivy").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(!record.password_hash.contains("plaintext-pw"));
    }
}
