use chrono::Local;
use llmapi::{generate_image, LLMClient, LLMProvider, LLMType};
use tracing::{info, warn};

use crate::config::Endpoints;
use crate::constants::{GEMINI_IMAGE_MODEL, OPENAI_IMAGE_MODEL};
use crate::error::AppError;
use crate::fs_utils::{image_link, save_image};
use crate::models::{GenerationRequest, GenerationResult, ImageSize};
use crate::settings::Settings;
use crate::translation::{contains_korean, Translator};
use crate::vault::Vault;

/// Provider-specific size literal for an abstract size. The two services
/// support different wide formats.
pub fn size_token(size: ImageSize, provider: LLMProvider) -> &'static str {
    match provider {
        LLMProvider::OpenAI => match size {
            ImageSize::Small | ImageSize::Medium => "1024x1024",
            ImageSize::Large => "1792x1024",
        },
        LLMProvider::Gemini => match size {
            ImageSize::Small | ImageSize::Medium => "1024x1024",
            ImageSize::Large => "1408x768",
        },
    }
}

/// Turns a [`GenerationRequest`] into a saved image in the vault.
#[derive(Debug)]
pub struct ImageGenerator<V> {
    vault: V,
    settings: Settings,
    openai: LLMClient,
    gemini: LLMClient,
    translator: Translator,
}

impl<V: Vault> ImageGenerator<V> {
    pub fn new(vault: V, settings: &Settings, endpoints: &Endpoints) -> Self {
        Self {
            vault,
            settings: settings.clone(),
            openai: LLMClient::new(
                LLMProvider::OpenAI,
                settings.openai_api_key.clone(),
                endpoints.openai_images(),
                OPENAI_IMAGE_MODEL,
                LLMType::Image,
            ),
            gemini: LLMClient::new(
                LLMProvider::Gemini,
                settings.gemini_api_key.clone(),
                endpoints.gemini_images(),
                GEMINI_IMAGE_MODEL,
                LLMType::Image,
            ),
            translator: Translator::new(settings, endpoints),
        }
    }

    /// Swaps in new settings and keys without rebuilding the clients.
    pub fn update_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
        self.openai.update_api_key(settings.openai_api_key.clone());
        self.gemini.update_api_key(settings.gemini_api_key.clone());
        self.translator.update_settings(settings);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn contains_korean(&self, text: &str) -> bool {
        contains_korean(text)
    }

    pub async fn translate_prompt(&self, prompt: &str) -> Result<String, AppError> {
        self.translator.translate(prompt).await
    }

    pub fn image_link(&self, image_path: &str) -> String {
        image_link(image_path)
    }

    fn client_for(&self, provider: LLMProvider) -> &LLMClient {
        match provider {
            LLMProvider::OpenAI => &self.openai,
            LLMProvider::Gemini => &self.gemini,
        }
    }

    /// Never fails: every error in the chain ends up in the result.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        match self.try_generate(request).await {
            Ok(result) => result,
            Err(err) => {
                warn!(provider = %request.provider, error = %err, "image generation failed");
                GenerationResult::failed(err.to_string())
            }
        }
    }

    async fn try_generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, AppError> {
        let client = self.client_for(request.provider);
        if !client.has_api_key() {
            return Err(AppError::MissingApiKey(request.provider));
        }

        let size = size_token(request.size, request.provider);
        let image = generate_image(client, &request.prompt, size, &request.style).await?;

        let image_path = save_image(
            &self.vault,
            &image.data,
            &self.settings.save_location,
            Local::now(),
        )
        .await?;

        info!(provider = %request.provider, path = %image_path, "image generated");
        Ok(GenerationResult::succeeded(image_path, image.revised_prompt))
    }
}
