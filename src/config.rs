use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::constants::{
    APP_DIR_NAME, DATA_FILE_NAME, DEFAULT_GEMINI_ENDPOINT, DEFAULT_OPENAI_ENDPOINT,
};

/// Base URLs of the two services. Each provider exposes an image endpoint and a
/// chat endpoint under its base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub openai_base: String,
    pub gemini_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai_base: DEFAULT_OPENAI_ENDPOINT.to_string(),
            gemini_base: DEFAULT_GEMINI_ENDPOINT.to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(openai_base: impl Into<String>, gemini_base: impl Into<String>) -> Self {
        Self {
            openai_base: openai_base.into(),
            gemini_base: gemini_base.into(),
        }
    }

    pub fn openai_images(&self) -> String {
        trim(&self.openai_base).to_string()
    }

    pub fn openai_chat(&self) -> String {
        trim(&self.openai_base).to_string()
    }

    pub fn gemini_images(&self) -> String {
        format!("{}/models", trim(&self.gemini_base))
    }

    /// Gemini's OpenAI-compatible surface.
    pub fn gemini_chat(&self) -> String {
        format!("{}/openai", trim(&self.gemini_base))
    }
}

fn trim(base: &str) -> &str {
    base.trim().trim_end_matches('/')
}

/// `<config dir>/vault-image-gen/data.json`
pub fn default_data_file() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Failed to locate the user config directory")?;
    Ok(dir.join(APP_DIR_NAME).join(DATA_FILE_NAME))
}
