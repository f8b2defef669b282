use crate::commands::generate::generate_image;
use crate::commands::AppState;
use crate::error::AppError;
use crate::models::{GenerateImageRequest, GeneratedImageResponse, HistoryItem};
use crate::storage::DataStore;
use crate::vault::Vault;

pub fn list_history<V: Vault, S: DataStore>(state: &AppState<V, S>) -> Vec<HistoryItem> {
    state.history.history()
}

pub fn get_history_item<V: Vault, S: DataStore>(
    state: &AppState<V, S>,
    id: &str,
) -> Result<HistoryItem, AppError> {
    state
        .history
        .get_history_item_by_id(id)
        .cloned()
        .ok_or_else(|| AppError::HistoryItemNotFound(id.to_string()))
}

/// Link for re-inserting a past image.
pub fn history_link<V: Vault, S: DataStore>(
    state: &AppState<V, S>,
    id: &str,
) -> Result<String, AppError> {
    let item = get_history_item(state, id)?;
    Ok(state.generator.image_link(&item.image_path))
}

pub async fn delete_history_item<V: Vault, S: DataStore>(
    state: &mut AppState<V, S>,
    id: &str,
) -> Result<(), AppError> {
    state.history.delete_history_item(id).await
}

pub async fn clear_history<V: Vault, S: DataStore>(
    state: &mut AppState<V, S>,
) -> Result<(), AppError> {
    state.history.clear_history().await
}

/// Runs the item's original prompt again with the same provider, size and style.
/// The result is a new history entry; the old one stays.
pub async fn regenerate<V: Vault, S: DataStore>(
    state: &mut AppState<V, S>,
    id: &str,
) -> Result<GeneratedImageResponse, AppError> {
    let item = get_history_item(state, id)?;

    generate_image(
        state,
        GenerateImageRequest {
            prompt: item.original_prompt,
            size: Some(item.size),
            style: Some(item.style),
            provider: Some(item.provider),
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::models::{ImageSize, PluginData};
    use crate::settings::Settings;
    use crate::storage::MemoryStore;
    use crate::vault::FsVault;
    use llmapi::LLMProvider;
    use mockito::Matcher;
    use serde_json::json;

    fn stored_item(id: &str) -> HistoryItem {
        HistoryItem {
            id: id.into(),
            original_prompt: "a quiet harbour".into(),
            translated_prompt: "a quiet harbour".into(),
            image_path: "Attachments/sub/ai_image_20240101_000000.png".into(),
            timestamp: 1_704_067_200_000,
            provider: LLMProvider::OpenAI,
            size: ImageSize::Large,
            style: "natural".into(),
        }
    }

    async fn state_with_item(
        endpoints: &Endpoints,
        dir: &tempfile::TempDir,
    ) -> AppState<FsVault, MemoryStore> {
        AppState::load(
            FsVault::new(dir.path()),
            MemoryStore::with_data(PluginData {
                settings: Settings {
                    openai_api_key: "sk-test".into(),
                    ..Settings::default()
                },
                history: vec![stored_item("abc")],
            }),
            endpoints,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn link_for_stored_item_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_item(&Endpoints::default(), &dir).await;

        assert_eq!(
            history_link(&state, "abc").unwrap(),
            "![[ai_image_20240101_000000.png]]"
        );
        assert!(matches!(
            history_link(&state, "nope"),
            Err(AppError::HistoryItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn regenerate_reuses_item_parameters_and_prepends() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/images/generations")
            .match_body(Matcher::PartialJson(json!({
                "prompt": "a quiet harbour",
                "size": "1792x1024",
                "style": "natural"
            })))
            .with_status(200)
            .with_body(r#"{"data":[{"b64_json":"AAEC"}]}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut state =
            state_with_item(&Endpoints::new(server.url(), server.url()), &dir).await;

        let response = regenerate(&mut state, "abc").await.unwrap();

        mock.assert_async().await;
        let history = list_history(&state);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], response.item);
        assert_eq!(history[1].id, "abc");
        assert_ne!(response.item.id, "abc");
    }

    #[tokio::test]
    async fn delete_and_clear_go_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_item(&Endpoints::default(), &dir).await;

        delete_history_item(&mut state, "missing").await.unwrap();
        assert_eq!(list_history(&state).len(), 1);

        clear_history(&mut state).await.unwrap();
        assert!(list_history(&state).is_empty());
        assert_eq!(state.history().store().save_count(), 2);
    }
}
