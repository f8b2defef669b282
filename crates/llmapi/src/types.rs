use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    OpenAI,
    Gemini,
}

impl LLMProvider {
    /// Stable identifier used in persisted data and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "openai",
            LLMProvider::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "OpenAI",
            LLMProvider::Gemini => "Gemini",
        }
    }
}

impl fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "dall-e" | "dalle" => Ok(LLMProvider::OpenAI),
            "gemini" | "google" => Ok(LLMProvider::Gemini),
            other => Err(format!("Unknown provider: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LLMType {
    Chat,
    Image,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LLMUserType {
    Human,
    AI,
    System,
}

impl LLMUserType {
    pub fn from_str(role_str: &str) -> Option<Self> {
        match role_str.trim().to_lowercase().as_str() {
            "user" | "human" => Some(LLMUserType::Human),
            "model" | "ai" | "assistant" => Some(LLMUserType::AI),
            "system" => Some(LLMUserType::System),
            _ => None,
        }
    }

    pub fn as_openai_role(&self) -> &'static str {
        match self {
            LLMUserType::Human => "user",
            LLMUserType::AI => "assistant",
            LLMUserType::System => "system",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LLMMessage {
    pub role: LLMUserType,
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: LLMUserType::from_str(role).unwrap_or(LLMUserType::Human),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: LLMUserType::System,
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: LLMUserType::Human,
            content: content.into(),
        }
    }
}

/// Sampling knobs for a chat completion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_tokens: 1024,
        }
    }
}

/// Decoded image returned by a provider.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub revised_prompt: Option<String>,
}

/// A provider-tagged API client. One value per (provider, capability) pair;
/// the tag decides which request shape is used.
#[derive(Clone)]
pub struct LLMClient {
    pub(crate) provider: LLMProvider,
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
    pub(crate) default_model: String,
    pub(crate) llm_type: LLMType,
    pub(crate) http: reqwest::Client,
}

impl LLMClient {
    pub fn new(
        provider: LLMProvider,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
        llm_type: LLMType,
    ) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            default_model: default_model.into(),
            llm_type,
            http: reqwest::Client::new(),
        }
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    pub fn name(&self) -> &'static str {
        self.provider.id()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn update_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn llm_type(&self) -> LLMType {
        self.llm_type
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

impl fmt::Debug for LLMClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LLMClient")
            .field("provider", &self.provider)
            .field("api_key", &if self.has_api_key() { "<set>" } else { "<empty>" })
            .field("endpoint", &self.endpoint)
            .field("default_model", &self.default_model)
            .field("llm_type", &self.llm_type)
            .finish()
    }
}
