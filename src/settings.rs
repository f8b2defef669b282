use llmapi::LLMProvider;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{
    DEFAULT_MAX_HISTORY_ITEMS, DEFAULT_SAVE_LOCATION, MAX_HISTORY_ITEMS, MIN_HISTORY_ITEMS,
};
use crate::error::AppError;
use crate::models::{DallEStyle, GeminiStyle, ImageSize};

/// User settings. Every field has a default so a partial or older blob still
/// loads into a fully populated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub provider: LLMProvider,
    pub openai_api_key: String,
    pub gemini_api_key: String,
    pub save_location: String,
    pub default_size: ImageSize,
    pub default_dall_e_style: DallEStyle,
    pub default_gemini_style: GeminiStyle,
    pub auto_translate: bool,
    pub max_history_items: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: LLMProvider::OpenAI,
            openai_api_key: String::new(),
            gemini_api_key: String::new(),
            save_location: DEFAULT_SAVE_LOCATION.to_string(),
            default_size: ImageSize::Medium,
            default_dall_e_style: DallEStyle::Vivid,
            default_gemini_style: GeminiStyle::Photorealistic,
            auto_translate: true,
            max_history_items: DEFAULT_MAX_HISTORY_ITEMS,
        }
    }
}

impl Settings {
    pub fn default_style_for(&self, provider: LLMProvider) -> &'static str {
        match provider {
            LLMProvider::OpenAI => self.default_dall_e_style.as_str(),
            LLMProvider::Gemini => self.default_gemini_style.as_str(),
        }
    }

    /// Clamps the history capacity into range and gives the save location a
    /// trailing slash. Applied on load and after every update.
    pub fn normalize(&mut self) {
        let clamped = self
            .max_history_items
            .clamp(MIN_HISTORY_ITEMS, MAX_HISTORY_ITEMS);
        if clamped != self.max_history_items {
            warn!(
                configured = self.max_history_items,
                clamped, "history capacity out of range"
            );
            self.max_history_items = clamped;
        }

        self.save_location = normalize_save_location(&self.save_location);
    }

    /// Sets one field from its camelCase or snake_case name.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let invalid = |reason: String| AppError::InvalidSetting(format!("{key}: {reason}"));

        match key {
            "provider" => self.provider = value.parse().map_err(invalid)?,
            "openaiApiKey" | "openai_api_key" => self.openai_api_key = value.trim().to_string(),
            "geminiApiKey" | "gemini_api_key" => self.gemini_api_key = value.trim().to_string(),
            "saveLocation" | "save_location" => self.save_location = value.to_string(),
            "defaultSize" | "default_size" => self.default_size = value.parse().map_err(invalid)?,
            "defaultDallEStyle" | "default_dall_e_style" => {
                self.default_dall_e_style = value.parse().map_err(invalid)?
            }
            "defaultGeminiStyle" | "default_gemini_style" => {
                self.default_gemini_style = value.parse().map_err(invalid)?
            }
            "autoTranslate" | "auto_translate" => {
                self.auto_translate = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("expected true or false, got '{value}'")))?
            }
            "maxHistoryItems" | "max_history_items" => {
                self.max_history_items = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("expected a number, got '{value}'")))?
            }
            _ => return Err(AppError::InvalidSetting(format!("unknown setting '{key}'"))),
        }

        Ok(())
    }
}

fn normalize_save_location(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return DEFAULT_SAVE_LOCATION.to_string();
    }
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
