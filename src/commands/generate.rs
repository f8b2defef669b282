use tracing::{debug, info};

use crate::commands::AppState;
use crate::error::AppError;
use crate::models::{GenerateImageRequest, GeneratedImageResponse, GenerationRequest};
use crate::storage::DataStore;
use crate::vault::Vault;

/// Translate, generate, save, record. The history entry is persisted before
/// this returns; a failed generation records nothing.
pub async fn generate_image<V: Vault, S: DataStore>(
    state: &mut AppState<V, S>,
    payload: GenerateImageRequest,
) -> Result<GeneratedImageResponse, AppError> {
    let prompt = payload.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::EmptyPrompt);
    }

    let settings = state.history.settings();
    let provider = payload.provider.unwrap_or(settings.provider);
    let size = payload.size.unwrap_or(settings.default_size);
    let style = payload
        .style
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| settings.default_style_for(provider).to_string());

    let translated_prompt = if settings.auto_translate && state.generator.contains_korean(prompt) {
        let translated = state.generator.translate_prompt(prompt).await?;
        debug!(original = prompt, translated = %translated, "prompt translated");
        translated
    } else {
        prompt.to_string()
    };

    let result = state
        .generator
        .generate(&GenerationRequest {
            prompt: translated_prompt.clone(),
            size,
            style: style.clone(),
            provider,
        })
        .await;

    let image_path = match (result.success, result.image_path) {
        (true, Some(path)) => path,
        _ => {
            return Err(AppError::Generation(
                result
                    .error
                    .unwrap_or_else(|| "Failed to generate image".to_string()),
            ))
        }
    };

    let item = state
        .history
        .add_history_item(prompt, &translated_prompt, &image_path, provider, size, &style)
        .await?;

    info!(id = %item.id, %provider, "generation recorded");

    Ok(GeneratedImageResponse {
        link: state.generator.image_link(&item.image_path),
        item,
        revised_prompt: result.revised_prompt,
    })
}
