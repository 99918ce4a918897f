use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use pd_core::auth::UserRecord;
use pd_core::ports::{SessionStorePort, SESSION_USER_KEY};

/// Reads and clears the persisted session user.
pub struct CurrentSession {
    session_store: Arc<dyn SessionStorePort>,
}

impl CurrentSession {
    pub fn new(session_store: Arc<dyn SessionStorePort>) -> Self {
        Self { session_store }
    }

    /// Returns the persisted user, if any.
    ///
    /// An unreadable record is treated as signed out.
    pub async fn current_user(&self) -> anyhow::Result<Option<UserRecord>> {
        let Some(raw) = self
            .session_store
            .get(SESSION_USER_KEY)
            .await
            .context("failed to read session user")?
        else {
            return Ok(None);
        };

        match serde_json::from_str::<UserRecord>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(error = %err, "discarding unreadable session user");
                Ok(None)
            }
        }
    }

    pub async fn sign_out(&self) -> anyhow::Result<()> {
        self.session_store
            .remove(SESSION_USER_KEY)
            .await
            .context("failed to clear session user")?;
        info!("session user cleared");
        Ok(())
    }
}
