use tracing::info;

use crate::commands::AppState;
use crate::error::AppError;
use crate::settings::Settings;
use crate::storage::DataStore;
use crate::vault::Vault;

pub fn get_settings<V: Vault, S: DataStore>(state: &AppState<V, S>) -> Settings {
    state.history.settings().clone()
}

/// Persists the change, then hands the new settings to the generator so the
/// next request uses the new keys and provider.
pub async fn update_settings<V, S, F>(
    state: &mut AppState<V, S>,
    update: F,
) -> Result<Settings, AppError>
where
    V: Vault,
    S: DataStore,
    F: FnOnce(&mut Settings) -> Result<(), AppError>,
{
    let settings = state.history.update_settings(update).await?.clone();
    state.generator.update_settings(&settings);

    info!(provider = %settings.provider, "settings updated");
    Ok(settings)
}

pub async fn set_setting<V: Vault, S: DataStore>(
    state: &mut AppState<V, S>,
    key: &str,
    value: &str,
) -> Result<Settings, AppError> {
    update_settings(state, |settings| settings.set_field(key, value)).await
}
