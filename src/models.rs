use std::fmt;
use std::str::FromStr;

use llmapi::LLMProvider;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(format!("Unknown image size: {other}")),
        }
    }
}

/// Style tokens accepted by DALL-E 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DallEStyle {
    Natural,
    #[default]
    Vivid,
}

impl DallEStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Vivid => "vivid",
        }
    }
}

impl FromStr for DallEStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "natural" => Ok(Self::Natural),
            "vivid" => Ok(Self::Vivid),
            other => Err(format!("Unknown DALL-E style: {other}")),
        }
    }
}

/// Style tokens the Gemini provider turns into prompt enhancements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeminiStyle {
    #[default]
    Photorealistic,
    Artistic,
    Anime,
    Sketch,
}

impl GeminiStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photorealistic => "photorealistic",
            Self::Artistic => "artistic",
            Self::Anime => "anime",
            Self::Sketch => "sketch",
        }
    }
}

impl FromStr for GeminiStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "photorealistic" => Ok(Self::Photorealistic),
            "artistic" => Ok(Self::Artistic),
            "anime" => Ok(Self::Anime),
            "sketch" => Ok(Self::Sketch),
            other => Err(format!("Unknown Gemini style: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub original_prompt: String,
    pub translated_prompt: String,
    pub image_path: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub provider: LLMProvider,
    pub size: ImageSize,
    pub style: String,
}

impl HistoryItem {
    pub fn was_translated(&self) -> bool {
        self.original_prompt != self.translated_prompt
    }
}

/// The single persisted blob: settings plus the newest-first history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginData {
    pub settings: Settings,
    pub history: Vec<HistoryItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub size: ImageSize,
    pub style: String,
    pub provider: LLMProvider,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    pub image_path: Option<String>,
    pub error: Option<String>,
    pub revised_prompt: Option<String>,
}

impl GenerationResult {
    pub fn succeeded(image_path: String, revised_prompt: Option<String>) -> Self {
        Self {
            success: true,
            image_path: Some(image_path),
            error: None,
            revised_prompt,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image_path: None,
            error: Some(error.into()),
            revised_prompt: None,
        }
    }
}

/// Input of the generate command. Unset fields fall back to the settings defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub size: Option<ImageSize>,
    pub style: Option<String>,
    pub provider: Option<LLMProvider>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImageResponse {
    pub item: HistoryItem,
    pub link: String,
    pub revised_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_item_uses_camel_case_keys() {
        let item = HistoryItem {
            id: "1".into(),
            original_prompt: "고양이".into(),
            translated_prompt: "a cat".into(),
            image_path: "Attachments/ai_image_20240101_000000.png".into(),
            timestamp: 1_704_067_200_000,
            provider: LLMProvider::Gemini,
            size: ImageSize::Large,
            style: "anime".into(),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["originalPrompt"], "고양이");
        assert_eq!(value["imagePath"], "Attachments/ai_image_20240101_000000.png");
        assert_eq!(value["provider"], "gemini");
        assert_eq!(value["size"], "large");
        assert!(item.was_translated());
    }

    #[test]
    fn parses_enum_tokens_case_insensitively() {
        assert_eq!("LARGE".parse::<ImageSize>().unwrap(), ImageSize::Large);
        assert_eq!("Natural".parse::<DallEStyle>().unwrap(), DallEStyle::Natural);
        assert_eq!("sketch".parse::<GeminiStyle>().unwrap(), GeminiStyle::Sketch);
        assert!("huge".parse::<ImageSize>().is_err());
    }

    #[test]
    fn empty_blob_defaults_every_field() {
        let data: PluginData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, PluginData::default());
    }
}
