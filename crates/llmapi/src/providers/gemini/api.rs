use serde_json::{Value, json};
use tracing::debug;

use crate::error::LlmError;
use crate::types::{GeneratedImage, LLMClient, LLMProvider};
use crate::utils::{decode_base64, read_json_response};

use super::models::GeminiResponse;

const GEMINI_DEFAULT_MIME: &str = "image/png";
const GENERATE_PREFIX: &str = "Generate an image: ";

/// Appends the fixed enhancement phrase for `style`. Style tokens are matched
/// exactly; anything else leaves the prompt untouched.
pub fn enhance_prompt_for_style(prompt: &str, style: &str) -> String {
    let enhancement = match style {
        "photorealistic" => "photorealistic, high detail, professional photography, sharp focus",
        "artistic" => "artistic interpretation, creative, expressive, painterly style",
        "anime" => "anime style, manga illustration, Japanese animation aesthetic",
        "sketch" => "pencil sketch, hand-drawn, detailed linework, graphite drawing",
        _ => return prompt.to_string(),
    };

    format!("{prompt}, {enhancement}")
}

/// Maps a `WIDTHxHEIGHT` size token onto an aspect ratio Gemini understands.
pub fn aspect_ratio_for_size(size: &str) -> Option<&'static str> {
    match size.trim() {
        "1024x1024" => Some("1:1"),
        "1408x768" | "1792x1024" => Some("16:9"),
        "768x1408" | "1024x1792" => Some("9:16"),
        _ => None,
    }
}

pub fn build_generate_body(prompt: &str, size: &str, style: &str) -> Value {
    let text = format!("{GENERATE_PREFIX}{}", enhance_prompt_for_style(prompt, style));

    let mut generation_config = json!({
        "responseModalities": ["TEXT", "IMAGE"]
    });
    if let Some(aspect_ratio) = aspect_ratio_for_size(size) {
        generation_config["imageConfig"] = json!({ "aspectRatio": aspect_ratio });
    }

    json!({
        "contents": [
            {
                "parts": [ { "text": text } ]
            }
        ],
        "generationConfig": generation_config
    })
}

/// Calls `{endpoint}/{model}:generateContent` with the key in the query string.
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
        "{}/{}:generateContent",
        client.endpoint().trim_end_matches('/'),
        client.default_model()
    );
    let body = build_generate_body(prompt, size, style);

    debug!(%provider, model = client.default_model(), size, style, "requesting image");

    let response = client
        .http()
        .post(url)
        .query(&[("key", client.api_key())])
        .json(&body)
        .send()
        .await
        .map_err(|source| LlmError::network(provider, source))?;

    let parsed: GeminiResponse = read_json_response(provider, response).await?;
    extract_generated_image(parsed)
}

/// Finds the first inline image in the first candidate. Text parts seen before
/// it are kept as the revised prompt.
pub fn extract_generated_image(response: GeminiResponse) -> Result<GeneratedImage, LlmError> {
    let provider = LLMProvider::Gemini;

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .ok_or(LlmError::EmptyContent(provider))?;

    let mut first_text: Option<String> = None;

    for part in parts {
        if let Some(inline_data) = part.inline_data {
            let data = inline_data.data.trim();
            if data.is_empty() {
                continue;
            }

            let mime_type = inline_data.mime_type.trim();
            let mime_type = if mime_type.is_empty() {
                GEMINI_DEFAULT_MIME
            } else {
                mime_type
            };

            return Ok(GeneratedImage {
                data: decode_base64(provider, data)?,
                mime_type: mime_type.to_string(),
                revised_prompt: first_text,
            });
        }

        if let Some(text) = part.text {
            let trimmed = text.trim();
            if !trimmed.is_empty() && first_text.is_none() {
                first_text = Some(trimmed.to_string());
            }
        }
    }

    Err(LlmError::TextOnly(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LLMType;
    use mockito::Matcher;

    fn image_client(endpoint: &str, key: &str) -> LLMClient {
        LLMClient::new(
            LLMProvider::Gemini,
            key,
            endpoint,
            "gemini-2.5-flash-image",
            LLMType::Image,
        )
    }

    #[test]
    fn enhances_each_known_style() {
        assert_eq!(
            enhance_prompt_for_style("a cat", "anime"),
            "a cat, anime style, manga illustration, Japanese animation aesthetic"
        );
        assert_eq!(
            enhance_prompt_for_style("a cat", "sketch"),
            "a cat, pencil sketch, hand-drawn, detailed linework, graphite drawing"
        );
        assert!(enhance_prompt_for_style("a cat", "photorealistic").ends_with("sharp focus"));
        assert!(enhance_prompt_for_style("a cat", "artistic").ends_with("painterly style"));
    }

    #[test]
    fn unknown_style_passes_prompt_through() {
        assert_eq!(enhance_prompt_for_style("a cat", "vivid"), "a cat");
        assert_eq!(enhance_prompt_for_style("a cat", ""), "a cat");
        assert_eq!(enhance_prompt_for_style("a cat", "Anime"), "a cat");
    }

    #[test]
    fn body_requests_text_and_image_output() {
        let body = build_generate_body("a cat", "1408x768", "sketch");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Generate an image: a cat, pencil sketch, hand-drawn, detailed linework, graphite drawing"
        );
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            json!(["TEXT", "IMAGE"])
        );
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");

        let unknown = build_generate_body("a cat", "640x480", "sketch");
        assert!(unknown["generationConfig"].get("imageConfig").is_none());
    }

    #[tokio::test]
    async fn returns_first_inline_image() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/gemini-2.5-flash-image:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "AIza-test".into()))
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"role":"model","parts":[
                    {"text":"Here is your cat."},
                    {"inlineData":{"mimeType":"image/png","data":"AAEC"}}
                ]}}]}"#,
            )
            .create_async()
            .await;

        let client = image_client(&server.url(), "AIza-test");
        let image = generate_image(&client, "a cat", "1024x1024", "anime")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(image.data, vec![0x00, 0x01, 0x02]);
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.revised_prompt.as_deref(), Some("Here is your cat."));
    }

    #[tokio::test]
    async fn text_only_response_is_reported_distinctly() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/gemini-2.5-flash-image:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"I can't draw that."}]}}]}"#)
            .create_async()
            .await;

        let client = image_client(&server.url(), "AIza-test");
        let err = generate_image(&client, "a cat", "1024x1024", "anime")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::TextOnly(LLMProvider::Gemini)));
        assert!(err.to_string().contains("text only"));
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/gemini-2.5-flash-image:generateContent")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"API key not valid.","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let client = image_client(&server.url(), "bad");
        let err = generate_image(&client, "a cat", "1024x1024", "anime")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "API key not valid.");
    }

    #[tokio::test]
    async fn transport_failure_is_prefixed_and_hides_the_key() {
        let client = image_client("http://127.0.0.1:1", "AIza-SECRET-KEY");
        let err = generate_image(&client, "a cat", "1024x1024", "anime")
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, LlmError::Network { .. }));
        assert!(message.starts_with("Gemini request failed:"), "{message}");
        assert!(!message.contains("AIza-SECRET-KEY"), "{message}");
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/gemini-2.5-flash-image:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = image_client(&server.url(), "AIza-test");
        let err = generate_image(&client, "a cat", "1024x1024", "anime")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse Gemini response"));
    }

    #[test]
    fn empty_parts_is_text_only() {
        let response: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert!(matches!(
            extract_generated_image(response),
            Err(LlmError::TextOnly(LLMProvider::Gemini))
        ));
    }

    #[test]
    fn missing_candidates_is_empty_content() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        let err = extract_generated_image(response).unwrap_err();
        assert_eq!(err.to_string(), "No content received from Gemini");

        let blocked: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(matches!(
            extract_generated_image(blocked),
            Err(LlmError::EmptyContent(LLMProvider::Gemini))
        ));
    }
}
