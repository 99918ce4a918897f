//! Setup orchestrator.
//!
//! This module coordinates the setup state machine, the media capability
//! provider and the paced advance between steps.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, info_span, warn, Instrument};

use pd_core::{
    auth::{UserRecord, UserRole},
    permission::{PermissionCapability, PermissionError, SetupStep},
    ports::SetupEventPort,
    setup::{SetupAction, SetupEvent, SetupSession, SetupStateMachine, SetupView},
};

use crate::media::MediaCapabilityProvider;
use crate::usecases::session::FinalizeSession;
use crate::usecases::setup::context::SetupContext;

/// Errors produced by the setup orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Permission(#[from] PermissionError),
    #[error("permission setup has not been started")]
    NotStarted,
    #[error("permission setup is already complete")]
    AlreadyComplete,
    #[error("permission setup is not complete yet")]
    NotComplete,
    #[error("step {index} was just granted; wait for the next step")]
    AdvancePending { index: usize },
    #[error("the current step needs {expected}, not {requested}")]
    OutOfOrder {
        expected: PermissionCapability,
        requested: PermissionCapability,
    },
    #[error("{role} accounts do not go through permission setup")]
    RoleNotEligible { role: UserRole },
    #[error("permission setup was cancelled")]
    Cancelled,
    #[error("finalize session failed: {0}")]
    Finalize(#[source] anyhow::Error),
}

/// Orchestrator that drives the setup session and its side effects.
pub struct SetupOrchestrator {
    context: Arc<SetupContext>,

    provider: Arc<MediaCapabilityProvider>,
    finalize_session: Arc<FinalizeSession>,
    setup_event_port: Arc<dyn SetupEventPort>,
    advance_delay: Duration,
}

impl SetupOrchestrator {
    pub fn new(
        provider: Arc<MediaCapabilityProvider>,
        finalize_session: Arc<FinalizeSession>,
        setup_event_port: Arc<dyn SetupEventPort>,
        advance_delay: Duration,
    ) -> Self {
        Self {
            context: SetupContext::default().arc(),
            provider,
            finalize_session,
            setup_event_port,
            advance_delay,
        }
    }

    /// Begins setup for an authenticated proctor.
    ///
    /// Restarting replaces the active session: its pending advance is dropped
    /// and every held resource is released.
    pub async fn start_setup(&self, user: UserRecord) -> Result<SetupView, SetupError> {
        if !user.is_proctor() {
            return Err(SetupError::RoleNotEligible { role: user.role });
        }
        self.context.renew_cancel_token().await;
        self.dispatch(SetupEvent::Start { user }).await
    }

    /// Acquires `capability` for the current step.
    ///
    /// 仅允许授权当前步骤的能力；推进延时期间拒绝新的授权。
    pub async fn grant(&self, capability: PermissionCapability) -> Result<SetupView, SetupError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!("usecase.setup_orchestrator.grant", capability = %capability);
        async {
            let session = self.context.get_session().await;
            Self::ensure_grantable(&session, capability)?;

            let cancel = self.context.cancel_token().await;
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("acquisition interrupted by cancel");
                    return Err(SetupError::Cancelled);
                }
                outcome = self.provider.acquire(capability) => outcome,
            };

            let event = match &outcome {
                Ok(_) => SetupEvent::GrantSucceeded { capability },
                Err(error) => SetupEvent::GrantFailed {
                    capability,
                    error: error.clone(),
                },
            };
            let view = self.apply(event).await?;

            match outcome {
                Ok(_) => Ok(view),
                Err(error) => Err(SetupError::Permission(error)),
            }
        }
        .instrument(span)
        .await
    }

    pub async fn is_complete(&self) -> bool {
        self.context.get_session().await.is_complete()
    }

    pub async fn current_step(&self) -> Option<&'static SetupStep> {
        self.context.get_session().await.current_step()
    }

    pub async fn get_state(&self) -> SetupView {
        self.context.get_session().await.view()
    }

    pub async fn session(&self) -> SetupSession {
        self.context.get_session().await
    }

    pub fn provider(&self) -> &Arc<MediaCapabilityProvider> {
        &self.provider
    }

    /// Finalizes a complete setup and returns the user handed to the app.
    ///
    /// Acquired media stays registered for the exam session.
    pub async fn enter_dashboard(&self) -> Result<UserRecord, SetupError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!("usecase.setup_orchestrator.enter_dashboard");
        async {
            let session = self.context.get_session().await;
            if !session.is_started() {
                return Err(SetupError::NotStarted);
            }
            if !session.is_complete() {
                return Err(SetupError::NotComplete);
            }
            let user = session.pending_user().cloned().ok_or(SetupError::NotStarted)?;
            self.apply(SetupEvent::EnterDashboard).await?;
            Ok(user)
        }
        .instrument(span)
        .await
    }

    /// Abandons setup, interrupting any in-flight acquisition.
    pub async fn cancel_setup(&self) -> Result<SetupView, SetupError> {
        self.context.fire_cancel().await;
        self.dispatch(SetupEvent::Cancel).await
    }

    async fn dispatch(&self, event: SetupEvent) -> Result<SetupView, SetupError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!("usecase.setup_orchestrator.dispatch", event = ?event);
        self.apply(event).instrument(span).await
    }

    /// Runs one transition. Caller must hold the dispatch lock.
    async fn apply(&self, event: SetupEvent) -> Result<SetupView, SetupError> {
        let current = self.context.get_session().await;
        let from = current.view();
        let event_name = format!("{:?}", event);
        let (next, actions) = SetupStateMachine::transition(current, event);
        info!(from = ?from, to = ?next.view(), event = %event_name, "setup state transition");

        self.execute_actions(actions).await?;
        self.set_session_and_emit(next.clone()).await;
        Ok(next.view())
    }

    async fn execute_actions(&self, actions: Vec<SetupAction>) -> Result<(), SetupError> {
        for action in actions {
            debug!(?action, "setup executing action");
            match action {
                SetupAction::ScheduleAdvance { from_index } => {
                    self.schedule_advance(from_index).await;
                    debug!(from_index, "setup action ScheduleAdvance completed");
                }
                SetupAction::CancelPendingAdvance => {
                    let aborted = self.context.cancel_pending_advance().await;
                    debug!(aborted, "setup action CancelPendingAdvance completed");
                }
                SetupAction::ReleaseResources => {
                    let released = self.provider.release_all().await;
                    debug!(released, "setup action ReleaseResources completed");
                }
                SetupAction::FinalizeSession { user } => {
                    self.finalize_session
                        .execute(&user)
                        .await
                        .map_err(SetupError::Finalize)?;
                    debug!(user_id = %user.id, "setup action FinalizeSession completed");
                }
            }
        }
        Ok(())
    }

    async fn schedule_advance(&self, from_index: usize) {
        let context = Arc::clone(&self.context);
        let setup_event_port = Arc::clone(&self.setup_event_port);
        let delay = self.advance_delay;

        let span = info_span!("usecase.setup_orchestrator.advance", from_index);
        let task = tokio::spawn(
            async move {
                tokio::time::sleep(delay).await;
                let _dispatch_guard = context.acquire_dispatch_lock().await;

                let current = context.get_session().await;
                let (next, _) =
                    SetupStateMachine::transition(current.clone(), SetupEvent::AdvanceElapsed {
                        from_index,
                    });
                if next == current {
                    debug!("stale advance ignored");
                    return;
                }
                info!(to = ?next.view(), "setup step advanced");
                context.set_session(next.clone()).await;
                setup_event_port.emit_setup_state_changed(next.view()).await;
            }
            .instrument(span),
        );
        self.context.replace_pending_advance(task.abort_handle()).await;
    }

    async fn set_session_and_emit(&self, session: SetupSession) {
        let view = session.view();
        self.context.set_session(session).await;
        self.setup_event_port.emit_setup_state_changed(view).await;
    }

    fn ensure_grantable(
        session: &SetupSession,
        capability: PermissionCapability,
    ) -> Result<(), SetupError> {
        if !session.is_started() {
            return Err(SetupError::NotStarted);
        }
        if session.is_complete() {
            return Err(SetupError::AlreadyComplete);
        }
        if session.advance_pending() {
            return Err(SetupError::AdvancePending {
                index: session.current_step_index(),
            });
        }
        match session.current_step() {
            Some(step) if step.capability == capability => Ok(()),
            Some(step) => Err(SetupError::OutOfOrder {
                expected: step.capability,
                requested: capability,
            }),
            None => Err(SetupError::AlreadyComplete),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use pd_core::config::MediaConfig;
    use pd_core::ports::SESSION_USER_KEY;

    use crate::test_support::{user, FakePlatform, ManualClock, RecordingSetupEventPort};
    use crate::usecases::session::mocks::{MockNavigation, MockSessionStore};

    const DELAY: Duration = Duration::from_millis(1000);

    struct Harness {
        orchestrator: Arc<SetupOrchestrator>,
        platform: Arc<FakePlatform>,
        events: Arc<RecordingSetupEventPort>,
    }

    fn harness_with(store: MockSessionStore, navigation: MockNavigation) -> Harness {
        let platform = Arc::new(FakePlatform::default());
        let provider = Arc::new(MediaCapabilityProvider::new(
            platform.clone(),
            Arc::new(ManualClock::default()),
            MediaConfig::default(),
        ));
        let finalize = Arc::new(FinalizeSession::new(Arc::new(store), Arc::new(navigation)));
        let events = Arc::new(RecordingSetupEventPort::default());
        let orchestrator = Arc::new(SetupOrchestrator::new(
            provider,
            finalize,
            events.clone(),
            DELAY,
        ));
        Harness {
            orchestrator,
            platform,
            events,
        }
    }

    fn harness() -> Harness {
        harness_with(MockSessionStore::new(), MockNavigation::new())
    }

    async fn wait_for_advance() {
        tokio::time::sleep(DELAY + Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn start_setup_rejects_non_proctor_roles() {
        let h = harness();

        let err = h
            .orchestrator
            .start_setup(user(UserRole::Student))
            .await
            .unwrap_err();

        assert!(matches!(err, SetupError::RoleNotEligible { role: UserRole::Student }));
        assert_eq!(h.orchestrator.get_state().await, SetupView::NotStarted);
    }

    #[tokio::test]
    async fn start_setup_lands_on_first_step() {
        let h = harness();

        let view = h.orchestrator.start_setup(user(UserRole::Proctor)).await.unwrap();

        match view {
            SetupView::AwaitingStep {
                index,
                total,
                step,
                permissions,
                error,
                advancing,
            } => {
                assert_eq!((index, total), (1, 4));
                assert_eq!(step.capability, PermissionCapability::Camera);
                assert_eq!(permissions.granted().count(), 0);
                assert!(error.is_none());
                assert!(!advancing);
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert_eq!(h.events.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn grant_before_start_is_rejected() {
        let h = harness();

        let err = h
            .orchestrator
            .grant(PermissionCapability::Camera)
            .await
            .unwrap_err();

        assert!(matches!(err, SetupError::NotStarted));
        assert_eq!(h.platform.calls(PermissionCapability::Camera), 0);
    }

    #[tokio::test]
    async fn out_of_order_grant_never_reaches_the_platform() {
        let h = harness();
        h.orchestrator.start_setup(user(UserRole::Proctor)).await.unwrap();

        let err = h
            .orchestrator
            .grant(PermissionCapability::Screen)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SetupError::OutOfOrder {
                expected: PermissionCapability::Camera,
                requested: PermissionCapability::Screen,
            }
        ));
        assert_eq!(h.platform.calls(PermissionCapability::Screen), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn grant_paces_the_advance_to_the_next_step() {
        let h = harness();
        h.orchestrator.start_setup(user(UserRole::Proctor)).await.unwrap();

        let view = h.orchestrator.grant(PermissionCapability::Camera).await.unwrap();
        assert!(matches!(view, SetupView::AwaitingStep { index: 1, advancing: true, .. }));

        let err = h
            .orchestrator
            .grant(PermissionCapability::Camera)
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::AdvancePending { index: 1 }));

        wait_for_advance().await;

        let step = h.orchestrator.current_step().await.unwrap();
        assert_eq!(step.capability, PermissionCapability::Microphone);
        let last = h.events.snapshot().await.pop().unwrap();
        assert!(matches!(last, SetupView::AwaitingStep { index: 2, advancing: false, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_grant_keeps_step_and_allows_retry() {
        let h = harness();
        h.orchestrator.start_setup(user(UserRole::Proctor)).await.unwrap();
        h.platform.deny(PermissionCapability::Camera);

        let err = h
            .orchestrator
            .grant(PermissionCapability::Camera)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SetupError::Permission(PermissionError::CameraDenied)
        ));
        let session = h.orchestrator.session().await;
        assert_eq!(session.current_step_index(), 1);
        assert_eq!(session.last_error(), Some(&PermissionError::CameraDenied));

        h.platform.allow_all();
        h.orchestrator.grant(PermissionCapability::Camera).await.unwrap();
        let session = h.orchestrator.session().await;
        assert!(session.permissions().is_granted(PermissionCapability::Camera));
        assert!(session.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_advance_and_releases_media() {
        let h = harness();
        h.orchestrator.start_setup(user(UserRole::Proctor)).await.unwrap();
        h.orchestrator.grant(PermissionCapability::Camera).await.unwrap();

        let view = h.orchestrator.cancel_setup().await.unwrap();
        assert_eq!(view, SetupView::NotStarted);
        assert_eq!(h.platform.stop_count(), 1);

        wait_for_advance().await;
        assert_eq!(h.orchestrator.get_state().await, SetupView::NotStarted);
        assert!(h.orchestrator.provider().held().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_in_flight_acquisition() {
        let h = harness();
        *h.platform.camera_delay.lock().unwrap() = Some(Duration::from_secs(30));
        h.orchestrator.start_setup(user(UserRole::Proctor)).await.unwrap();

        let orchestrator = Arc::clone(&h.orchestrator);
        let grant =
            tokio::spawn(async move { orchestrator.grant(PermissionCapability::Camera).await });
        tokio::task::yield_now().await;

        h.orchestrator.cancel_setup().await.unwrap();

        let err = grant.await.unwrap().unwrap_err();
        assert!(matches!(err, SetupError::Cancelled));
        assert_eq!(h.orchestrator.get_state().await, SetupView::NotStarted);
        assert!(h.orchestrator.provider().held().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_releases_resources_of_the_abandoned_session() {
        let h = harness();
        h.orchestrator.start_setup(user(UserRole::Proctor)).await.unwrap();
        h.orchestrator.grant(PermissionCapability::Camera).await.unwrap();

        h.orchestrator.start_setup(user(UserRole::Proctor)).await.unwrap();

        let session = h.orchestrator.session().await;
        assert_eq!(session.current_step_index(), 1);
        assert!(!session.permissions().is_granted(PermissionCapability::Camera));
        assert!(h.orchestrator.provider().held().await.is_empty());

        wait_for_advance().await;
        assert_eq!(h.orchestrator.session().await.current_step_index(), 1);
    }

    #[tokio::test]
    async fn enter_dashboard_requires_completion() {
        let h = harness();
        assert!(matches!(
            h.orchestrator.enter_dashboard().await.unwrap_err(),
            SetupError::NotStarted
        ));

        h.orchestrator.start_setup(user(UserRole::Proctor)).await.unwrap();
        assert!(matches!(
            h.orchestrator.enter_dashboard().await.unwrap_err(),
            SetupError::NotComplete
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn completed_setup_finalizes_and_keeps_media_for_the_exam() {
        let mut store = MockSessionStore::new();
        store
            .expect_put()
            .withf(|key, _| key == SESSION_USER_KEY)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut navigation = MockNavigation::new();
        navigation
            .expect_enter_authenticated_app()
            .times(1)
            .returning(|_| Ok(()));
        let h = harness_with(store, navigation);
        let proctor = user(UserRole::Proctor);
        h.orchestrator.start_setup(proctor.clone()).await.unwrap();

        for capability in PermissionCapability::ALL {
            h.orchestrator.grant(capability).await.unwrap();
            wait_for_advance().await;
        }
        assert!(h.orchestrator.is_complete().await);
        assert!(h.orchestrator.get_state().await.is_complete());
        assert!(matches!(
            h.orchestrator
                .grant(PermissionCapability::Location)
                .await
                .unwrap_err(),
            SetupError::AlreadyComplete
        ));

        let entered = h.orchestrator.enter_dashboard().await.unwrap();

        assert_eq!(entered, proctor);
        assert_eq!(h.orchestrator.session().await.current_step_index(), 0);
        assert_eq!(h.orchestrator.provider().held().await.len(), 4);
    }
}
