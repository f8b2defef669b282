use llmapi::{chat_completion, ChatOptions, LLMClient, LLMMessage, LLMProvider, LLMType, LlmError};
use tracing::{debug, info};

use crate::config::Endpoints;
use crate::constants::{
    GEMINI_CHAT_MODEL, OPENAI_CHAT_MODEL, TRANSLATION_MAX_TOKENS, TRANSLATION_SYSTEM_PROMPT,
    TRANSLATION_TEMPERATURE,
};
use crate::error::AppError;
use crate::settings::Settings;

/// True if `text` holds any Hangul jamo or syllable.
pub fn contains_korean(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(
            c,
            '\u{1100}'..='\u{11FF}'
                | '\u{3130}'..='\u{318F}'
                | '\u{A960}'..='\u{A97F}'
                | '\u{AC00}'..='\u{D7AF}'
                | '\u{D7B0}'..='\u{D7FF}'
        )
    })
}

/// Rewrites Korean prompts into English through the selected provider's chat
/// model before they are sent for image generation.
#[derive(Debug, Clone)]
pub struct Translator {
    openai: LLMClient,
    gemini: LLMClient,
    provider: LLMProvider,
    auto_translate: bool,
}

impl Translator {
    pub fn new(settings: &Settings, endpoints: &Endpoints) -> Self {
        Self {
            openai: LLMClient::new(
                LLMProvider::OpenAI,
                settings.openai_api_key.clone(),
                endpoints.openai_chat(),
                OPENAI_CHAT_MODEL,
                LLMType::Chat,
            ),
            gemini: LLMClient::new(
                LLMProvider::Gemini,
                settings.gemini_api_key.clone(),
                endpoints.gemini_chat(),
                GEMINI_CHAT_MODEL,
                LLMType::Chat,
            ),
            provider: settings.provider,
            auto_translate: settings.auto_translate,
        }
    }

    pub fn update_settings(&mut self, settings: &Settings) {
        self.openai.update_api_key(settings.openai_api_key.clone());
        self.gemini.update_api_key(settings.gemini_api_key.clone());
        self.provider = settings.provider;
        self.auto_translate = settings.auto_translate;
    }

    pub fn auto_translate(&self) -> bool {
        self.auto_translate
    }

    fn active_client(&self) -> &LLMClient {
        match self.provider {
            LLMProvider::OpenAI => &self.openai,
            LLMProvider::Gemini => &self.gemini,
        }
    }

    /// Returns `text` untouched, without any request, unless it contains Korean
    /// and auto-translate is on.
    pub async fn translate(&self, text: &str) -> Result<String, AppError> {
        if !self.auto_translate || !contains_korean(text) {
            return Ok(text.to_string());
        }

        let client = self.active_client();
        if !client.has_api_key() {
            return Err(AppError::MissingApiKey(self.provider));
        }

        debug!(provider = %self.provider, "translating prompt");

        let reply = chat_completion(
            client,
            vec![
                LLMMessage::system(TRANSLATION_SYSTEM_PROMPT),
                LLMMessage::human(text),
            ],
            ChatOptions {
                temperature: TRANSLATION_TEMPERATURE,
                max_tokens: TRANSLATION_MAX_TOKENS,
            },
        )
        .await
        .map_err(|err| match err {
            LlmError::MissingApiKey(provider) => AppError::MissingApiKey(provider),
            other => AppError::Translation(other),
        })?;

        let translated = reply.content.trim();
        if translated.is_empty() {
            return Ok(text.to_string());
        }

        info!(provider = %self.provider, "translated prompt");
        Ok(translated.to_string())
    }
}
