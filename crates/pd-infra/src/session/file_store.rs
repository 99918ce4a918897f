//! File-based session store
//!
//! Implements `SessionStorePort` on top of a single JSON object file in the
//! application data directory. Each key maps to one string value.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use pd_core::ports::SessionStorePort;

type Entries = BTreeMap<String, String>;

pub struct FileSessionStore {
    session_file_path: PathBuf,
    /// Serializes read-modify-write cycles on the file.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Create store with custom file path
    pub fn new(session_file_path: PathBuf) -> Self {
        Self {
            session_file_path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.session_file_path
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.session_file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn load(&self) -> anyhow::Result<Entries> {
        if !fs::try_exists(&self.session_file_path).await? {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&self.session_file_path).await?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse session file: {e}"))
    }

    async fn persist(&self, entries: &Entries) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| anyhow::anyhow!("Failed to serialize session entries: {e}"))?;

        let mut file = fs::File::create(&self.session_file_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create session file: {e}"))?;

        file.write_all(json.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write session file: {e}"))?;

        file.sync_all()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sync session file: {e}"))?;

        Ok(())
    }
}

#[async_trait]
impl SessionStorePort for FileSessionStore {
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await?;
        debug!(key, path = %self.session_file_path.display(), "session entry stored");
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let _guard = self.write_lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
            debug!(key, "session entry removed");
        }
        Ok(())
    }
}
