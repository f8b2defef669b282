use chrono::Utc;
use llmapi::LLMProvider;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{HistoryItem, ImageSize, PluginData};
use crate::settings::Settings;
use crate::storage::DataStore;

/// Owns the settings and the generation history, and writes both back to the
/// store after every mutation.
#[derive(Debug)]
pub struct HistoryManager<S> {
    store: S,
    settings: Settings,
    history: Vec<HistoryItem>,
}

impl<S: DataStore> HistoryManager<S> {
    /// Reads the stored blob, filling defaults on first run. Settings are
    /// normalized and the history is cut to capacity; nothing is written back
    /// until the first mutation.
    pub async fn load(store: S) -> Result<Self, AppError> {
        let data = store.load().await?.unwrap_or_default();

        let mut manager = Self {
            store,
            settings: data.settings,
            history: data.history,
        };
        manager.settings.normalize();
        manager.truncate_to_capacity();

        debug!(
            items = manager.history.len(),
            capacity = manager.settings.max_history_items,
            "loaded history"
        );
        Ok(manager)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies `update` to the settings, normalizes them, drops history beyond a
    /// reduced capacity and persists.
    pub async fn update_settings<F>(&mut self, update: F) -> Result<&Settings, AppError>
    where
        F: FnOnce(&mut Settings) -> Result<(), AppError>,
    {
        let mut next = self.settings.clone();
        update(&mut next)?;
        next.normalize();

        self.settings = next;
        self.truncate_to_capacity();
        self.save_data().await?;
        Ok(&self.settings)
    }

    /// Newest first. The returned vector is a copy.
    pub fn history(&self) -> Vec<HistoryItem> {
        self.history.clone()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn get_history_item_by_id(&self, id: &str) -> Option<&HistoryItem> {
        self.history.iter().find(|item| item.id == id)
    }

    pub async fn add_history_item(
        &mut self,
        original_prompt: &str,
        translated_prompt: &str,
        image_path: &str,
        provider: LLMProvider,
        size: ImageSize,
        style: &str,
    ) -> Result<HistoryItem, AppError> {
        let item = HistoryItem {
            id: Uuid::new_v4().to_string(),
            original_prompt: original_prompt.to_string(),
            translated_prompt: translated_prompt.to_string(),
            image_path: image_path.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            provider,
            size,
            style: style.to_string(),
        };

        self.history.insert(0, item.clone());
        self.truncate_to_capacity();
        self.save_data().await?;

        info!(id = %item.id, path = %item.image_path, "recorded generation");
        Ok(item)
    }

    /// Removing an unknown id leaves the history as it was.
    pub async fn delete_history_item(&mut self, id: &str) -> Result<(), AppError> {
        self.history.retain(|item| item.id != id);
        self.save_data().await
    }

    pub async fn clear_history(&mut self) -> Result<(), AppError> {
        self.history.clear();
        self.save_data().await
    }

    fn truncate_to_capacity(&mut self) {
        self.history.truncate(self.settings.max_history_items);
    }

    async fn save_data(&self) -> Result<(), AppError> {
        let data = PluginData {
            settings: self.settings.clone(),
            history: self.history.clone(),
        };
        self.store.save(&data).await
    }
}
