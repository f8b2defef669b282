use llmapi::{LLMProvider, LlmError};

/// Application-level error shared by the store, the generator and the commands.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No key configured for the provider a request needs.
    #[error("{0} API key is not configured. Please add your API key in settings.")]
    MissingApiKey(LLMProvider),

    #[error("Please enter a prompt")]
    EmptyPrompt,

    /// The translation pre-pass failed; generation never started.
    #[error("Translation failed: {0}")]
    Translation(#[source] LlmError),

    #[error(transparent)]
    Provider(#[from] LlmError),

    /// A generation that came back as a failure result.
    #[error("{0}")]
    Generation(String),

    #[error("History item '{0}' not found")]
    HistoryItemNotFound(String),

    #[error("Path exists but is not a folder: {0}")]
    NotAFolder(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialise state: {0}")]
    Serde(#[from] serde_json::Error),
}
