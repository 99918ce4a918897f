use async_trait::async_trait;

/// Key under which the authenticated user record is persisted.
pub const SESSION_USER_KEY: &str = "session_user";

/// Durable key-value storage for the application session.
#[async_trait]
pub trait SessionStorePort: Send + Sync {
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
