pub mod generate;
pub mod history;
pub mod settings;

use crate::config::Endpoints;
use crate::error::AppError;
use crate::generator::ImageGenerator;
use crate::history::HistoryManager;
use crate::storage::DataStore;
use crate::vault::Vault;

/// Everything a command needs: the persisted store and the generator built
/// from its settings.
#[derive(Debug)]
pub struct AppState<V, S> {
    pub(crate) history: HistoryManager<S>,
    pub(crate) generator: ImageGenerator<V>,
}

impl<V: Vault, S: DataStore> AppState<V, S> {
    pub async fn load(vault: V, store: S, endpoints: &Endpoints) -> Result<Self, AppError> {
        let history = HistoryManager::load(store).await?;
        let generator = ImageGenerator::new(vault, history.settings(), endpoints);
        Ok(Self { history, generator })
    }

    pub fn history(&self) -> &HistoryManager<S> {
        &self.history
    }

    pub fn generator(&self) -> &ImageGenerator<V> {
        &self.generator
    }
}
