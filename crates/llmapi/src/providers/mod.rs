pub mod gemini;
pub mod openai;

use crate::error::LlmError;
use crate::types::{ChatOptions, GeneratedImage, LLMClient, LLMMessage, LLMProvider};

pub use gemini::{enhance_prompt_for_style, generate_image as gemini_generate_image};
pub use openai::{generate_image as openai_generate_image, send_chat_completion};

/// Generates one image with whichever provider `client` is tagged with.
pub async fn generate_image(
    client: &LLMClient,
    prompt: &str,
    size: &str,
    style: &str,
) -> Result<GeneratedImage, LlmError> {
    match client.provider() {
        LLMProvider::OpenAI => openai_generate_image(client, prompt, size, style).await,
        LLMProvider::Gemini => gemini_generate_image(client, prompt, size, style).await,
    }
}

/// Both providers expose the OpenAI chat-completions protocol (Gemini through its
/// `/openai` compatibility layer), so the request shape is shared.
pub async fn chat_completion(
    client: &LLMClient,
    messages: Vec<LLMMessage>,
    options: ChatOptions,
) -> Result<LLMMessage, LlmError> {
    send_chat_completion(client, messages, options).await
}
