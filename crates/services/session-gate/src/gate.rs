//! Session gate - the state machine guarding every protected page.
//!
//! The gate owns the session for one interactive process. Every transition
//! returns its outcome explicitly; callers re-query [`SessionGate::authorize`]
//! before rendering protected content.

use std::sync::Arc;

use common::ThrottleConfig;
use credential_store::CredentialService;
use domain::{Access, AuthError, AuthResult, HealthRecord, Page, RiskOutcome, Username};

use crate::inference::{AccessDenied, InferenceError, Predictor};
use crate::session::Session;
use crate::throttle::LoginThrottle;

pub struct SessionGate {
    credentials: Arc<dyn CredentialService>,
    session: Session,
    throttle: LoginThrottle,
}

impl SessionGate {
    /// Start an anonymous session backed by the given credential service
    pub fn new(credentials: Arc<dyn CredentialService>) -> Self {
        Self {
            credentials,
            session: Session::Anonymous,
            throttle: LoginThrottle::default(),
        }
    }

    /// Enable failed-login throttling
    pub fn with_throttle(mut self, config: ThrottleConfig) -> Self {
        self.throttle = LoginThrottle::new(config);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn identity(&self) -> Option<&Username> {
        self.session.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Verify credentials and bind the identity to the session.
    ///
    /// On any error the session is left exactly as it was. Logging in while
    /// already authenticated re-verifies and rebinds on success.
    pub async fn login(&mut self, username: &str, password: &str) -> AuthResult<Session> {
        self.throttle.check()?;

        match self.credentials.verify(username, password).await {
            Ok(identity) => {
                self.throttle.record_success();
                tracing::info!(username = %identity, "Login succeeded");
                self.session = Session::Authenticated(identity);
                Ok(self.session.clone())
            }
            Err(e) => {
                if e.is_credential_failure() {
                    self.throttle.record_failure();
                    tracing::warn!(username, "Login failed");
                }
                Err(e)
            }
        }
    }

    /// Register a new identity. Does not log in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> AuthResult<Username> {
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        self.credentials.register(username, password).await
    }

    /// Whether `username` is already registered.
    ///
    /// Advisory only: [`register`](Self::register) still enforces uniqueness
    /// atomically.
    pub async fn is_username_taken(&self, username: &str) -> AuthResult<bool> {
        self.credentials.contains(username).await
    }

    /// Drop the bound identity.
    ///
    /// Returns the identity that was discarded; logging out while anonymous
    /// is a no-op returning `None`.
    pub fn logout(&mut self) -> Option<Username> {
        match std::mem::take(&mut self.session) {
            Session::Authenticated(identity) => {
                tracing::info!(username = %identity, "Logged out");
                Some(identity)
            }
            Session::Anonymous => None,
        }
    }

    /// Decide whether `page` is reachable in the current state.
    pub fn authorize(&self, page: Page) -> Access {
        let access = Access::from(page.is_public() || self.session.is_authenticated());
        if !access.is_allowed() {
            tracing::debug!(%page, "Access denied");
        }
        access
    }

    /// [`authorize`](Self::authorize) as a `Result`, for use with `?`.
    pub fn guard(&self, page: Page) -> Result<(), AccessDenied> {
        match self.authorize(page) {
            Access::Allowed => Ok(()),
            Access::Denied => Err(AccessDenied(page)),
        }
    }

    /// Pages to offer in the navigation menu.
    ///
    /// Login and Register are hidden once a user is signed in.
    pub fn menu(&self) -> Vec<Page> {
        Page::ALL
            .into_iter()
            .filter(|page| !(self.session.is_authenticated() && page.is_public()))
            .collect()
    }

    /// Score `features` with the external model, only when the Model page
    /// is reachable.
    pub async fn predict(
        &self,
        predictor: &dyn Predictor,
        features: &HealthRecord,
    ) -> Result<RiskOutcome, InferenceError> {
        self.guard(Page::Model)?;

        let outcome = predictor.predict(features).await?;
        tracing::info!(level = %outcome.level, "Prediction completed");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credential_store::service::MockCredentialService;
    use mockall::predicate::eq;

    fn username(name: &str) -> Username {
        Username::parse(name).unwrap()
    }

    fn gate_with(mock: MockCredentialService) -> SessionGate {
        SessionGate::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_login_binds_identity() {
        let mut mock = MockCredentialService::new();
        mock.expect_verify()
            .with(eq("bob"), eq("secret"))
            .times(1)
            .returning(|u, _| Ok(Username::parse(u).unwrap()));

        let mut gate = gate_with(mock);
        let state = gate.login("bob", "secret").await.unwrap();

        assert_eq!(state, Session::Authenticated(username("bob")));
        assert_eq!(gate.identity(), Some(&username("bob")));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_unchanged() {
        let mut mock = MockCredentialService::new();
        mock.expect_verify()
            .returning(|_, _| Err(AuthError::InvalidCredentials));

        let mut gate = gate_with(mock);
        for _ in 0..3 {
            assert_eq!(
                gate.login("carol", "x").await,
                Err(AuthError::InvalidCredentials)
            );
            assert_eq!(gate.session(), &Session::Anonymous);
        }
    }

    #[tokio::test]
    async fn test_failed_relogin_keeps_existing_identity() {
        let mut mock = MockCredentialService::new();
        mock.expect_verify()
            .with(eq("bob"), eq("secret"))
            .returning(|u, _| Ok(Username::parse(u).unwrap()));
        mock.expect_verify()
            .with(eq("mallory"), eq("guess"))
            .returning(|_, _| Err(AuthError::InvalidCredentials));

        let mut gate = gate_with(mock);
        gate.login("bob", "secret").await.unwrap();

        assert!(gate.login("mallory", "guess").await.is_err());
        assert_eq!(gate.identity(), Some(&username("bob")));
    }

    #[tokio::test]
    async fn test_store_unavailable_is_not_masked() {
        let mut mock = MockCredentialService::new();
        mock.expect_verify()
            .returning(|_, _| Err(AuthError::store_unavailable("database is locked")));
        mock.expect_register()
            .returning(|_, _| Err(AuthError::store_unavailable("database is locked")));

        let mut gate = gate_with(mock);

        assert!(matches!(
            gate.login("bob", "secret").await,
            Err(AuthError::StoreUnavailable(_))
        ));
        assert!(matches!(
            gate.register("bob", "secret", "secret").await,
            Err(AuthError::StoreUnavailable(_))
        ));
        assert!(!gate.is_authenticated());
    }

    #[tokio::test]
    async fn test_password_mismatch_never_reaches_store() {
        // No expectations: any call into the mock panics
        let gate = gate_with(MockCredentialService::new());

        assert_eq!(
            gate.register("dan", "p1", "p2").await,
            Err(AuthError::PasswordMismatch)
        );
    }

    #[tokio::test]
    async fn test_register_does_not_log_in() {
        let mut mock = MockCredentialService::new();
        mock.expect_register()
            .with(eq("dan"), eq("p1"))
            .times(1)
            .returning(|u, _| Ok(Username::parse(u).unwrap()));

        let gate = gate_with(mock);
        gate.register("dan", "p1", "p1").await.unwrap();

        assert_eq!(gate.session(), &Session::Anonymous);
        assert_eq!(gate.authorize(Page::Home), Access::Denied);
    }

    #[tokio::test]
    async fn test_username_precheck_delegates_to_store() {
        let mut mock = MockCredentialService::new();
        mock.expect_contains()
            .with(eq("alice"))
            .times(1)
            .returning(|_| Ok(true));
        mock.expect_contains()
            .with(eq("bob"))
            .times(1)
            .returning(|_| Ok(false));

        let gate = gate_with(mock);

        assert_eq!(gate.is_username_taken("alice").await, Ok(true));
        assert_eq!(gate.is_username_taken("bob").await, Ok(false));
        assert!(!gate.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_is_deterministic_when_anonymous() {
        let mut gate = gate_with(MockCredentialService::new());

        assert_eq!(gate.logout(), None);
        assert_eq!(gate.logout(), None);
        assert_eq!(gate.session(), &Session::Anonymous);
    }

    #[tokio::test]
    async fn test_logout_returns_discarded_identity() {
        let mut mock = MockCredentialService::new();
        mock.expect_verify()
            .returning(|u, _| Ok(Username::parse(u).unwrap()));

        let mut gate = gate_with(mock);
        gate.login("bob", "secret").await.unwrap();

        assert_eq!(gate.logout(), Some(username("bob")));
        assert_eq!(gate.session(), &Session::Anonymous);
    }

    #[test]
    fn test_public_pages_always_allowed() {
        let gate = gate_with(MockCredentialService::new());

        assert_eq!(gate.authorize(Page::Login), Access::Allowed);
        assert_eq!(gate.authorize(Page::Register), Access::Allowed);
        for page in [Page::Home, Page::Model, Page::Metrics, Page::About] {
            assert_eq!(gate.authorize(page), Access::Denied);
            assert_eq!(gate.guard(page), Err(AccessDenied(page)));
        }
    }

    #[tokio::test]
    async fn test_menu_hides_public_pages_when_signed_in() {
        let mut mock = MockCredentialService::new();
        mock.expect_verify()
            .returning(|u, _| Ok(Username::parse(u).unwrap()));

        let mut gate = gate_with(mock);
        assert_eq!(gate.menu(), Page::ALL.to_vec());

        gate.login("bob", "secret").await.unwrap();
        assert_eq!(
            gate.menu(),
            vec![Page::Home, Page::Model, Page::Metrics, Page::About]
        );

        gate.logout();
        assert_eq!(gate.menu(), Page::ALL.to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_login_skips_store() {
        let mut mock = MockCredentialService::new();
        mock.expect_verify()
            .times(2)
            .returning(|_, _| Err(AuthError::InvalidCredentials));

        let mut gate = gate_with(mock).with_throttle(ThrottleConfig {
            max_failed_attempts: 2,
            lockout_seconds: 30,
        });

        assert_eq!(gate.login("bob", "a").await, Err(AuthError::InvalidCredentials));
        assert_eq!(gate.login("bob", "b").await, Err(AuthError::InvalidCredentials));
        assert_eq!(
            gate.login("bob", "c").await,
            Err(AuthError::TooManyAttempts { retry_after_secs: 30 })
        );
        assert!(!gate.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_errors_do_not_count_toward_lockout() {
        let mut mock = MockCredentialService::new();
        mock.expect_verify()
            .times(3)
            .returning(|_, _| Err(AuthError::store_unavailable("down")));

        let mut gate = gate_with(mock).with_throttle(ThrottleConfig {
            max_failed_attempts: 1,
            lockout_seconds: 30,
        });

        for _ in 0..3 {
            assert!(matches!(
                gate.login("bob", "secret").await,
                Err(AuthError::StoreUnavailable(_))
            ));
        }
    }
}
