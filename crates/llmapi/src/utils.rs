use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use serde::de::DeserializeOwned;

use crate::error::LlmError;
use crate::types::LLMProvider;

pub fn decode_base64(provider: LLMProvider, data: &str) -> Result<Vec<u8>, LlmError> {
    BASE64_ENGINE
        .decode(data.trim())
        .map_err(|source| LlmError::Decode { provider, source })
}

/// Pulls `error.message` out of an OpenAI- or Gemini-style error body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Reads a response body, mapping transport failures, non-success statuses and
/// malformed JSON onto [`LlmError`].
pub(crate) async fn read_json_response<T: DeserializeOwned>(
    provider: LLMProvider,
    response: reqwest::Response,
) -> Result<T, LlmError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| LlmError::network(provider, source))?;

    if !status.is_success() {
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("{provider} API error: {}", status.as_u16()));
        return Err(LlmError::Api {
            provider,
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|source| LlmError::Parse { provider, source })
}
