use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::fs;
use tokio::fs::try_exists;

use crate::error::AppError;
use crate::models::PluginData;

/// Durable home of the combined settings + history blob.
pub trait DataStore: Send + Sync {
    /// `None` on first run.
    fn load(&self) -> impl Future<Output = Result<Option<PluginData>, AppError>> + Send;

    /// Replaces the stored blob wholesale.
    fn save(&self, data: &PluginData) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataStore for JsonFileStore {
    async fn load(&self) -> Result<Option<PluginData>, AppError> {
        if !try_exists(&self.path).await? {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).await?;
        if contents.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&contents)?))
    }

    async fn save(&self, data: &PluginData) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let payload = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }
}

/// In-process store. Counts saves so callers can check write-through.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<PluginData>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: PluginData) -> Self {
        Self {
            data: Mutex::new(Some(data)),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<PluginData> {
        self.data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl DataStore for MemoryStore {
    async fn load(&self) -> Result<Option<PluginData>, AppError> {
        Ok(self.snapshot())
    }

    async fn save(&self, data: &PluginData) -> Result<(), AppError> {
        *self
            .data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(data.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
