use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pd_core::ports::SessionStorePort;

/// Process-local session store. Nothing survives a restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorePort for InMemorySessionStore {
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
