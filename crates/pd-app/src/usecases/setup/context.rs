use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use pd_core::setup::SetupSession;

/// Shared setup context containing session state and dispatch lock.
///
/// Shared between `SetupOrchestrator` and the pacing task it spawns so both
/// read and write the same session.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `session`.
/// - `dispatch_lock`: serializes transition + execute_actions + state update.
/// - `session`: used for both reading (`get_session`) and writing.
///
/// `pending_advance` and `cancel_token` are independent and never held across
/// an await on another lock.
#[derive(Clone)]
pub struct SetupContext {
    session: Arc<Mutex<SetupSession>>,
    dispatch_lock: Arc<Mutex<()>>,
    /// Scheduled pacing task, at most one at a time.
    pending_advance: Arc<Mutex<Option<AbortHandle>>>,
    /// Fired by cancel to interrupt an in-flight acquisition.
    cancel_token: Arc<Mutex<CancellationToken>>,
}

impl SetupContext {
    pub fn new(initial: SetupSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(initial)),
            dispatch_lock: Arc::new(Mutex::new(())),
            pending_advance: Arc::new(Mutex::new(None)),
            cancel_token: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Lightweight read; does NOT acquire `dispatch_lock`.
    pub async fn get_session(&self) -> SetupSession {
        self.session.lock().await.clone()
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Should only be called after acquiring `dispatch_lock`.
    pub async fn set_session(&self, session: SetupSession) {
        let mut guard = self.session.lock().await;
        *guard = session;
    }

    /// Stores the handle of a newly scheduled advance, aborting any previous one.
    pub async fn replace_pending_advance(&self, handle: AbortHandle) {
        if let Some(previous) = self.pending_advance.lock().await.replace(handle) {
            previous.abort();
        }
    }

    /// Aborts the scheduled advance, if any. Returns whether one was pending.
    pub async fn cancel_pending_advance(&self) -> bool {
        match self.pending_advance.lock().await.take() {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                was_running
            }
            None => false,
        }
    }

    pub async fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.lock().await.clone()
    }

    /// Installs a fresh token for a new session and fires the old one.
    pub async fn renew_cancel_token(&self) -> CancellationToken {
        let fresh = CancellationToken::new();
        let previous = std::mem::replace(&mut *self.cancel_token.lock().await, fresh.clone());
        previous.cancel();
        fresh
    }

    /// Fires the current token without waiting for the dispatch lock.
    pub async fn fire_cancel(&self) {
        self.cancel_token.lock().await.cancel();
    }
}

impl Default for SetupContext {
    fn default() -> Self {
        Self::new(SetupSession::not_started())
    }
}
