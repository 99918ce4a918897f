use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use pd_core::auth::UserRecord;
use pd_core::ports::{HostNavigationPort, SessionStorePort, SESSION_USER_KEY};

/// Use case for handing an authenticated user over to the app.
///
/// Persists the user under the session key, then asks the host to navigate.
/// Navigation is never attempted when persistence fails.
pub struct FinalizeSession {
    session_store: Arc<dyn SessionStorePort>,
    navigation: Arc<dyn HostNavigationPort>,
}

impl FinalizeSession {
    pub fn new(
        session_store: Arc<dyn SessionStorePort>,
        navigation: Arc<dyn HostNavigationPort>,
    ) -> Self {
        Self {
            session_store,
            navigation,
        }
    }

    pub async fn execute(&self, user: &UserRecord) -> anyhow::Result<()> {
        let payload = serde_json::to_string(user).context("failed to serialize session user")?;
        self.session_store
            .put(SESSION_USER_KEY, &payload)
            .await
            .context("failed to persist session user")?;
        info!(user_id = %user.id, role = %user.role, "session user persisted");

        self.navigation
            .enter_authenticated_app(user)
            .await
            .context("failed to enter authenticated app")
    }
}
