use async_trait::async_trait;

use crate::auth::UserRecord;

/// Host shell transitions (login screen → authenticated application).
#[async_trait]
pub trait HostNavigationPort: Send + Sync {
    async fn enter_authenticated_app(&self, user: &UserRecord) -> anyhow::Result<()>;
}
