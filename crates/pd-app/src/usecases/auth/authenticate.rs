use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};

use pd_core::auth::{require, AuthResponse, SignupRequest, UserRecord, ValidationError};
use pd_core::ports::AuthPort;
use pd_core::setup::SetupView;

use crate::usecases::session::FinalizeSession;
use crate::usecases::setup::{SetupError, SetupOrchestrator};

const DEFAULT_CREDENTIAL_ERROR: &str = "Invalid email or password";

/// Where an authenticated user goes next.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "next", content = "payload", rename_all = "snake_case")]
pub enum AuthOutcome {
    /// Proctor accounts must grant device permissions first.
    SetupRequired(SetupView),
    /// Session finalized; the host has entered the app.
    Authenticated(UserRecord),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    CredentialInvalid(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("credential backend failed: {0}")]
    Gateway(#[source] anyhow::Error),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("finalize session failed: {0}")]
    Finalize(#[source] anyhow::Error),
}

/// Submits credentials and routes the user by role.
pub struct AuthenticateUser {
    auth: Arc<dyn AuthPort>,
    setup: Arc<SetupOrchestrator>,
    finalize_session: Arc<FinalizeSession>,
}

impl AuthenticateUser {
    pub fn new(
        auth: Arc<dyn AuthPort>,
        setup: Arc<SetupOrchestrator>,
        finalize_session: Arc<FinalizeSession>,
    ) -> Self {
        Self {
            auth,
            setup,
            finalize_session,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let span = info_span!("usecase.authenticate.login", email = %email);
        async {
            require("email", email)?;
            require("password", password)?;
            let response = self
                .auth
                .login(email, password)
                .await
                .map_err(AuthError::Gateway)?;
            self.route(response).await
        }
        .instrument(span)
        .await
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<AuthOutcome, AuthError> {
        let span = info_span!(
            "usecase.authenticate.signup",
            email = %request.email,
            role = %request.role
        );
        async {
            request.validate()?;
            let response = self
                .auth
                .signup(&request)
                .await
                .map_err(AuthError::Gateway)?;
            self.route(response).await
        }
        .instrument(span)
        .await
    }

    async fn route(&self, response: AuthResponse) -> Result<AuthOutcome, AuthError> {
        let user = match response {
            AuthResponse {
                success: true,
                user: Some(user),
                ..
            } => user,
            AuthResponse { error, .. } => {
                let message = error.unwrap_or_else(|| DEFAULT_CREDENTIAL_ERROR.to_string());
                warn!(reason = %message, "credentials rejected");
                return Err(AuthError::CredentialInvalid(message));
            }
        };

        if user.is_proctor() {
            info!(user_id = %user.id, "proctor authenticated; starting permission setup");
            let view = self.setup.start_setup(user).await?;
            return Ok(AuthOutcome::SetupRequired(view));
        }

        info!(user_id = %user.id, role = %user.role, "user authenticated; skipping permission setup");
        self.finalize_session
            .execute(&user)
            .await
            .map_err(AuthError::Finalize)?;
        Ok(AuthOutcome::Authenticated(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use mockall::mock;

    use pd_core::auth::UserRole;
    use pd_core::config::MediaConfig;

    use crate::media::MediaCapabilityProvider;
    use crate::test_support::{user, FakePlatform, ManualClock, RecordingSetupEventPort};
    use crate::usecases::session::mocks::{MockNavigation, MockSessionStore};

    mock! {
        pub Auth {}

        #[async_trait]
        impl AuthPort for Auth {
            async fn login(&self, email: &str, password: &str) -> anyhow::Result<AuthResponse>;
            async fn signup(&self, request: &SignupRequest) -> anyhow::Result<AuthResponse>;
        }
    }

    fn use_case(
        auth: MockAuth,
        store: MockSessionStore,
        navigation: MockNavigation,
    ) -> (AuthenticateUser, Arc<SetupOrchestrator>) {
        let provider = Arc::new(MediaCapabilityProvider::new(
            Arc::new(FakePlatform::default()),
            Arc::new(ManualClock::default()),
            MediaConfig::default(),
        ));
        let finalize = Arc::new(FinalizeSession::new(Arc::new(store), Arc::new(navigation)));
        let setup = Arc::new(SetupOrchestrator::new(
            provider,
            finalize.clone(),
            Arc::new(RecordingSetupEventPort::default()),
            Duration::from_millis(1000),
        ));
        (
            AuthenticateUser::new(Arc::new(auth), setup.clone(), finalize),
            setup,
        )
    }

    #[tokio::test]
    async fn proctor_login_starts_setup_without_finalizing() {
        let mut auth = MockAuth::new();
        auth.expect_login()
            .times(1)
            .returning(|_, _| Ok(AuthResponse::ok(user(UserRole::Proctor))));
        let mut store = MockSessionStore::new();
        store.expect_put().never();
        let (use_case, setup) = use_case(auth, store, MockNavigation::new());

        let outcome = use_case.login("proctor@example.com", "secret").await.unwrap();

        assert!(matches!(
            outcome,
            AuthOutcome::SetupRequired(SetupView::AwaitingStep { index: 1, .. })
        ));
        assert!(setup.session().await.is_started());
    }

    #[tokio::test]
    async fn student_login_is_finalized_immediately() {
        let mut auth = MockAuth::new();
        auth.expect_login()
            .returning(|_, _| Ok(AuthResponse::ok(user(UserRole::Student))));
        let mut store = MockSessionStore::new();
        store.expect_put().times(1).returning(|_, _| Ok(()));
        let mut navigation = MockNavigation::new();
        navigation
            .expect_enter_authenticated_app()
            .times(1)
            .returning(|_| Ok(()));
        let (use_case, setup) = use_case(auth, store, navigation);

        let outcome = use_case.login("student@example.com", "secret").await.unwrap();

        assert_eq!(outcome, AuthOutcome::Authenticated(user(UserRole::Student)));
        assert_eq!(setup.get_state().await, SetupView::NotStarted);
    }

    #[tokio::test]
    async fn rejected_credentials_surface_backend_message() {
        let mut auth = MockAuth::new();
        auth.expect_login()
            .returning(|_, _| Ok(AuthResponse::failed("Account locked")));
        let (use_case, _setup) = use_case(auth, MockSessionStore::new(), MockNavigation::new());

        let err = use_case.login("a@example.com", "pw").await.unwrap_err();

        assert!(matches!(err, AuthError::CredentialInvalid(message) if message == "Account locked"));
    }

    #[tokio::test]
    async fn success_without_user_is_invalid_credentials() {
        let mut auth = MockAuth::new();
        auth.expect_login().returning(|_, _| {
            Ok(AuthResponse {
                success: true,
                user: None,
                error: None,
            })
        });
        let (use_case, _setup) = use_case(auth, MockSessionStore::new(), MockNavigation::new());

        let err = use_case.login("a@example.com", "pw").await.unwrap_err();

        assert_eq!(err.to_string(), DEFAULT_CREDENTIAL_ERROR);
    }

    #[tokio::test]
    async fn blank_fields_never_reach_the_backend() {
        let mut auth = MockAuth::new();
        auth.expect_login().never();
        auth.expect_signup().never();
        let (use_case, _setup) = use_case(auth, MockSessionStore::new(), MockNavigation::new());

        let err = use_case.login("a@example.com", " ").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::MissingField { field: "password" })
        ));

        let request = SignupRequest {
            email: "a@example.com".to_string(),
            password: "pw".to_string(),
            name: String::new(),
            role: UserRole::Proctor,
        };
        let err = use_case.signup(request).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::MissingField { field: "name" })
        ));
    }

    #[tokio::test]
    async fn gateway_failure_is_wrapped() {
        let mut auth = MockAuth::new();
        auth.expect_signup()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        let (use_case, _setup) = use_case(auth, MockSessionStore::new(), MockNavigation::new());

        let request = SignupRequest {
            email: "a@example.com".to_string(),
            password: "pw".to_string(),
            name: "Ada".to_string(),
            role: UserRole::Admin,
        };
        let err = use_case.signup(request).await.unwrap_err();

        assert!(matches!(err, AuthError::Gateway(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
