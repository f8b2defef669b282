use serde_json::{Value, json};
use tracing::debug;

use crate::error::LlmError;
use crate::types::{ChatOptions, GeneratedImage, LLMClient, LLMMessage};
use crate::utils::{decode_base64, read_json_response};

use super::models::{ChatCompletionResponse, ChatContent, ImageGenerationResponse};

const OPENAI_IMAGE_MIME: &str = "image/png";

/// Calls `{endpoint}/images/generations` for a single base64-encoded image.
pub async fn generate_image(
    client: &LLMClient,
    prompt: &str,
    size: &str,
    style: &str,
) -> Result<GeneratedImage, LlmError> {
    let provider = client.provider();
    if !client.has_api_key() {
        return Err(LlmError::MissingApiKey(provider));
    }

    let url = format!(
        "{}/images/generations",
        client.endpoint().trim_end_matches('/')
    );
    let payload = json!({
        "model": client.default_model(),
        "prompt": prompt,
        "n": 1,
        "size": size,
        "style": style,
        "response_format": "b64_json"
    });

    debug!(%provider, model = client.default_model(), size, style, "requesting image");

    let response = client
        .http()
        .post(url)
        .bearer_auth(client.api_key())
        .json(&payload)
        .send()
        .await
        .map_err(|source| LlmError::network(provider, source))?;

    let parsed: ImageGenerationResponse = read_json_response(provider, response).await?;

    let first = parsed
        .data
        .into_iter()
        .next()
        .ok_or(LlmError::MissingImage(provider))?;
    let encoded = first
        .b64_json
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(LlmError::MissingImage(provider))?;

    Ok(GeneratedImage {
        data: decode_base64(provider, encoded)?,
        mime_type: OPENAI_IMAGE_MIME.to_string(),
        revised_prompt: first
            .revised_prompt
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()),
    })
}

/// Sends an OpenAI-protocol chat completion and returns the first choice.
/// A response without choices or content yields an empty assistant message.
pub async fn send_chat_completion(
    client: &LLMClient,
    messages: Vec<LLMMessage>,
    options: ChatOptions,
) -> Result<LLMMessage, LlmError> {
    let provider = client.provider();
    if !client.has_api_key() {
        return Err(LlmError::MissingApiKey(provider));
    }

    let url = format!(
        "{}/chat/completions",
        client.endpoint().trim_end_matches('/')
    );
    let payload = json!({
        "model": client.default_model(),
        "messages": convert_messages_to_openai(&messages),
        "max_tokens": options.max_tokens,
        "temperature": options.temperature
    });

    debug!(%provider, model = client.default_model(), "requesting chat completion");

    let response = client
        .http()
        .post(url)
        .bearer_auth(client.api_key())
        .json(&payload)
        .send()
        .await
        .map_err(|source| LlmError::network(provider, source))?;

    let parsed: ChatCompletionResponse = read_json_response(provider, response).await?;
    Ok(convert_openai_response(parsed))
}

fn convert_messages_to_openai(messages: &[LLMMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            json!({
                "role": message.role.as_openai_role(),
                "content": message.content
            })
        })
        .collect()
}

fn convert_openai_response(response: ChatCompletionResponse) -> LLMMessage {
    let Some(first_choice) = response.choices.into_iter().next() else {
        return LLMMessage::new("assistant", "");
    };

    let role = first_choice
        .message
        .role
        .unwrap_or_else(|| "assistant".to_string());

    let content = match first_choice.message.content {
        Some(ChatContent::Text(text)) => text,
        Some(ChatContent::Parts(parts)) => parts
            .into_iter()
            .filter(|part| matches!(part.kind.as_str(), "text" | "output_text"))
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    };

    LLMMessage::new(&role, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LLMProvider, LLMType, LLMUserType};
    use mockito::Matcher;

    fn image_client(endpoint: &str, key: &str) -> LLMClient {
        LLMClient::new(LLMProvider::OpenAI, key, endpoint, "dall-e-3", LLMType::Image)
    }

    #[tokio::test]
    async fn generates_image_from_b64_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/images/generations")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "dall-e-3",
                "prompt": "a red fox",
                "n": 1,
                "size": "1792x1024",
                "style": "vivid",
                "response_format": "b64_json"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"created":1,"data":[{"b64_json":"AAEC","revised_prompt":"A red fox in snow"}]}"#)
            .create_async()
            .await;

        let client = image_client(&server.url(), "sk-test");
        let image = generate_image(&client, "a red fox", "1792x1024", "vivid")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(image.data, vec![0x00, 0x01, 0x02]);
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.revised_prompt.as_deref(), Some("A red fox in snow"));
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/images/generations")
            .expect(0)
            .create_async()
            .await;

        let client = image_client(&server.url(), "  ");
        let err = generate_image(&client, "prompt", "1024x1024", "natural")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, LlmError::MissingApiKey(LLMProvider::OpenAI)));
        assert_eq!(err.to_string(), "OpenAI API key is not configured");
    }

    #[tokio::test]
    async fn api_error_uses_message_from_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/generations")
            .with_status(400)
            .with_body(r#"{"error":{"message":"Your request was rejected by the safety system."}}"#)
            .create_async()
            .await;

        let client = image_client(&server.url(), "sk-test");
        let err = generate_image(&client, "prompt", "1024x1024", "vivid")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Your request was rejected by the safety system.");
    }

    #[tokio::test]
    async fn api_error_without_body_message_is_status_coded() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/generations")
            .with_status(502)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let client = image_client(&server.url(), "sk-test");
        let err = generate_image(&client, "prompt", "1024x1024", "vivid")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "OpenAI API error: 502");
    }

    #[tokio::test]
    async fn success_without_b64_is_a_content_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/generations")
            .with_status(200)
            .with_body(r#"{"created":1,"data":[{"url":"https://example.invalid/x.png"}]}"#)
            .create_async()
            .await;

        let client = image_client(&server.url(), "sk-test");
        let err = generate_image(&client, "prompt", "1024x1024", "vivid")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No image data received from OpenAI");
    }

    #[tokio::test]
    async fn transport_failure_names_the_provider() {
        let client = image_client("http://127.0.0.1:1", "sk-test");
        let err = generate_image(&client, "prompt", "1024x1024", "vivid")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Network { provider: LLMProvider::OpenAI, .. }));
        assert!(err.to_string().starts_with("OpenAI request failed:"));
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/generations")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = image_client(&server.url(), "sk-test");
        let err = generate_image(&client, "prompt", "1024x1024", "vivid")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Parse { provider: LLMProvider::OpenAI, .. }));
        assert!(err.to_string().starts_with("Failed to parse OpenAI response"));
    }

    #[tokio::test]
    async fn chat_completion_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-chat")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "hello" }
                ],
                "max_tokens": 500
            })))
            .with_status(200)
            .with_body(r#"{"id":"c1","choices":[{"message":{"role":"assistant","content":"hi"}}]}"#)
            .create_async()
            .await;

        let client = LLMClient::new(
            LLMProvider::OpenAI,
            "sk-chat",
            server.url(),
            "gpt-4o-mini",
            LLMType::Chat,
        );
        let reply = send_chat_completion(
            &client,
            vec![LLMMessage::system("be brief"), LLMMessage::human("hello")],
            ChatOptions {
                temperature: 0.3,
                max_tokens: 500,
            },
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(reply.role, LLMUserType::AI);
        assert_eq!(reply.content, "hi");
    }

    #[test]
    fn empty_choices_become_empty_message() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        let message = convert_openai_response(response);
        assert_eq!(message.content, "");
    }
}
