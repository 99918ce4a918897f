use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use pd_core::auth::UserRecord;
use pd_core::ports::HostNavigationPort;

/// Navigation for hosts without a window: records the entered user.
pub struct HeadlessNavigation {
    entered: watch::Sender<Option<UserRecord>>,
}

impl HeadlessNavigation {
    pub fn new() -> Self {
        let (entered, _) = watch::channel(None);
        Self { entered }
    }

    /// The user most recently handed to the authenticated app.
    pub fn entered_user(&self) -> Option<UserRecord> {
        self.entered.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<UserRecord>> {
        self.entered.subscribe()
    }
}

impl Default for HeadlessNavigation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostNavigationPort for HeadlessNavigation {
    async fn enter_authenticated_app(&self, user: &UserRecord) -> anyhow::Result<()> {
        info!(user_id = %user.id, role = %user.role, "entering authenticated app");
        self.entered.send_replace(Some(user.clone()));
        Ok(())
    }
}
