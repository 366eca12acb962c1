use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::ShopError;

use super::ShopState;

/// Durable home of the shop tables.
#[async_trait]
pub trait Storage: Send + Sync {
    /// `Ok(None)` when nothing was saved yet.
    async fn load(&self) -> Result<Option<ShopState>, ShopError>;
    async fn save(&self, state: &ShopState) -> Result<(), ShopError>;
}

/// Keeps nothing; the live tables are the only copy.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage;

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self) -> Result<Option<ShopState>, ShopError> {
        Ok(None)
    }

    async fn save(&self, _state: &ShopState) -> Result<(), ShopError> {
        Ok(())
    }
}

/// Whole-state JSON snapshot. Written to a sibling temp file and renamed
/// over the target, so a crash mid-write keeps the previous snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn load(&self) -> Result<Option<ShopState>, ShopError> {
        if !tokio::fs::try_exists(&self.path).await? {
            info!(path = %self.path.display(), "No snapshot yet");
            return Ok(None);
        }
        let bytes = tokio::fs::read(&self.path).await?;
        let state = serde_json::from_slice(&bytes)?;
        info!(path = %self.path.display(), "Snapshot loaded");
        Ok(Some(state))
    }

    async fn save(&self, state: &ShopState) -> Result<(), ShopError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!(bytes = bytes.len(), "Snapshot saved");
        Ok(())
    }
}
