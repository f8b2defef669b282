use crate::types::LLMProvider;

/// Failure of a single provider call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{0} API key is not configured")]
    MissingApiKey(LLMProvider),

    /// The request never produced an HTTP response.
    #[error("{provider} request failed: {source}")]
    Network {
        provider: LLMProvider,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status. `message` is the provider's own error text when the
    /// body carried one.
    #[error("{message}")]
    Api {
        provider: LLMProvider,
        status: u16,
        message: String,
    },

    #[error("Failed to parse {provider} response: {source}")]
    Parse {
        provider: LLMProvider,
        #[source]
        source: serde_json::Error,
    },

    #[error("No content received from {0}")]
    EmptyContent(LLMProvider),

    #[error("No image data received from {0}")]
    MissingImage(LLMProvider),

    #[error("No image data received from {0}. The model may have returned text only.")]
    TextOnly(LLMProvider),

    #[error("Failed to decode image data from {provider}: {source}")]
    Decode {
        provider: LLMProvider,
        #[source]
        source: base64::DecodeError,
    },
}

impl LlmError {
    /// Transport failure. The URL is dropped from `source` because it can
    /// carry the API key as a query parameter.
    pub(crate) fn network(provider: LLMProvider, source: reqwest::Error) -> Self {
        LlmError::Network {
            provider,
            source: source.without_url(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
