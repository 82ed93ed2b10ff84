//! Thin HTTP client for the Gemini `generateContent` endpoint with image output.
//!
//! - Requests ask for `["TEXT", "IMAGE"]` response modalities.
//! - Only the first candidate is inspected; its first `inlineData` part wins.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ContentPart, GeneratedImage, ImageProvider};
use crate::error::{AppError, AppResult};
use crate::utils::data_uri::InlineImage;

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: Option<String>) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        GeminiClient { client: Client::new(), base_url: base, model, api_key }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    async fn generate(&self, parts: &[ContentPart]) -> AppResult<GeneratedImage> {
        let api_key = self.api_key.as_deref().ok_or(AppError::MissingApiKey)?;
        let url = self.endpoint();
        let body = GenerateContentRequest::from_parts(parts);
        tracing::debug!(model = %self.model, parts = parts.len(), "Sending generateContent request");

        let response = self.client.post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(AppError::HttpClient)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(AppError::Provider { status: status.as_u16(), body: error_body });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(AppError::HttpClient)?;
        extract_image(parsed)
    }
}

/// Pull the first inline image out of the first candidate.
pub fn extract_image(response: GenerateContentResponse) -> AppResult<GeneratedImage> {
    let candidate = response.candidates.into_iter().next().ok_or(AppError::NoImage)?;
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    for part in parts {
        if let Some(inline) = part.inline_data {
            return InlineImage::from_base64(inline.mime_type, &inline.data).ok_or(AppError::NoImage);
        }
        if let Some(text) = part.text {
            tracing::debug!(commentary = %text, "Discarding text part from image response");
        }
    }
    Err(AppError::NoImage)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn from_parts(parts: &[ContentPart]) -> Self {
        let parts = parts
            .iter()
            .map(|p| match p {
                ContentPart::Text(t) => Part { text: Some(t.clone()), inline_data: None },
                ContentPart::Image(img) => Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: img.mime_type.clone(),
                        data: img.base64_payload(),
                    }),
                },
            })
            .collect();
        GenerateContentRequest {
            contents: vec![RequestContent { role: "user".to_string(), parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(v: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_extract_first_inline_image() {
        let r = response(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here is your border"},
                    {"inlineData": {"mimeType": "image/png", "data": "AQID"}},
                    {"inlineData": {"mimeType": "image/jpeg", "data": "BAUG"}}
                ]}
            }]
        }));
        let img = extract_image(r).unwrap();
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_extract_ignores_later_candidates() {
        let r = response(json!({
            "candidates": [
                {"content": {"parts": [{"text": "I cannot draw that"}]}},
                {"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "AQID"}}]}}
            ]
        }));
        assert!(matches!(extract_image(r), Err(AppError::NoImage)));
    }

    #[test]
    fn test_extract_without_candidates_fails() {
        assert!(matches!(extract_image(response(json!({}))), Err(AppError::NoImage)));
        let blocked = response(json!({"candidates": [{"finishReason": "SAFETY"}]}));
        assert!(matches!(extract_image(blocked), Err(AppError::NoImage)));
    }

    #[test]
    fn test_extract_rejects_undecodable_payload() {
        let r = response(json!({
            "candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "%%%"}}]}}]
        }));
        assert!(extract_image(r).is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let parts = vec![
            ContentPart::text("Border design reference image:"),
            ContentPart::Image(InlineImage::new("image/png", vec![1, 2, 3])),
            ContentPart::text("a red saree"),
        ];
        let body = serde_json::to_value(GenerateContentRequest::from_parts(&parts)).unwrap();
        assert_eq!(body, json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {"text": "Border design reference image:"},
                    {"inlineData": {"mimeType": "image/png", "data": "AQID"}},
                    {"text": "a red saree"}
                ]
            }],
            "generationConfig": {"responseModalities": ["TEXT", "IMAGE"]}
        }));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:9999/".into(), "img-model".into(), None);
        assert_eq!(client.endpoint(), "http://localhost:9999/v1beta/models/img-model:generateContent");
    }

    /// Serves `replies` in order on an ephemeral port, recording each `x-goog-api-key`.
    async fn stub_server(
        replies: Vec<(u16, serde_json::Value)>,
    ) -> (String, std::sync::Arc<std::sync::Mutex<Vec<Option<String>>>>) {
        use axum::http::{HeaderMap, StatusCode};
        use std::sync::{Arc, Mutex};

        let replies = Arc::new(Mutex::new(std::collections::VecDeque::from(replies)));
        let keys = Arc::new(Mutex::new(Vec::new()));
        let seen = keys.clone();
        let handler = move |headers: HeaderMap| {
            let replies = replies.clone();
            let seen = seen.clone();
            async move {
                let key = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()).map(String::from);
                seen.lock().unwrap().push(key);
                let (status, body) = replies.lock().unwrap().pop_front().unwrap();
                (StatusCode::from_u16(status).unwrap(), axum::Json(body))
            }
        };
        let app = axum::Router::new().route("/v1beta/models/:model", axum::routing::post(handler));
        let server = axum::Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(app.into_make_service());
        let base = format!("http://{}", server.local_addr());
        tokio::spawn(server);
        (base, keys)
    }

    #[tokio::test]
    async fn test_generate_over_http() {
        let (base, keys) = stub_server(vec![
            (429, json!({"error": {"message": "quota exhausted"}})),
            (200, json!({
                "candidates": [{"content": {"parts": [
                    {"text": "Here you go"},
                    {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
                ]}}]
            })),
        ])
        .await;
        let client = GeminiClient::new(base, "img-model".into(), Some("secret-key".into()));

        match client.generate(&[ContentPart::text("temple border")]).await {
            Err(AppError::Provider { status, body }) => {
                assert_eq!(status, 429);
                assert!(body.contains("quota exhausted"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }

        let image = client.generate(&[ContentPart::text("temple border")]).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, vec![1, 2, 3]);

        let keys = keys.lock().unwrap().clone();
        assert_eq!(keys, vec![Some("secret-key".to_string()), Some("secret-key".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new("http://127.0.0.1:9".into(), "img-model".into(), None);
        let err = client.generate(&[ContentPart::text("motif")]).await.unwrap_err();
        assert!(matches!(err, AppError::MissingApiKey));
    }
}
