//! Google Gemini `generateContent` client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Prompt, ProviderKind, check_status, http_error};
use crate::error::ProviderResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Client for the Gemini models API.
///
/// The API key travels in the `key` query parameter. Gemini has no separate
/// system role here, so the instructions and the user turn are sent as one
/// text part.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl GeminiProvider {
    /// Create a client against `endpoint` (the models collection URL).
    pub fn new(client: Client, endpoint: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn url(&self, model: &str) -> String {
        format!("{}/{model}:generateContent", self.endpoint)
    }

    async fn send(
        &self,
        body: &GenerateContentRequest<'_>,
        api_key: &str,
        model: &str,
    ) -> ProviderResult<reqwest::Response> {
        self.client
            .post(self.url(model))
            .query(&[("key", api_key)])
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| http_error(ProviderKind::Gemini, e))
    }

    pub(super) async fn complete(
        &self,
        prompt: &Prompt,
        api_key: &str,
        model: &str,
    ) -> ProviderResult<String> {
        let text = format!("{}\n\n{}", prompt.system, prompt.user);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &text }],
            }],
            generation_config: GenerationConfig {
                temperature: Some(prompt.temperature),
                max_output_tokens: prompt.max_tokens,
            },
        };

        let response = self.send(&body, api_key, model).await?;
        let response = check_status(ProviderKind::Gemini, response).await?;
        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| http_error(ProviderKind::Gemini, e))?;

        tracing::debug!(model, "gemini completion received");
        Ok(parsed.first_text().unwrap_or_default())
    }

    pub(super) async fn probe(&self, api_key: &str, model: &str) -> bool {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "Hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: None,
                max_output_tokens: 5,
            },
        };
        match self.send(&body, api_key, model).await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "gemini key probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ContentType;
    use crate::error::ProviderError;
    use crate::providers::{DispatchConfig, GenerateRequest, Provider};
    use crate::tone::TonePreset;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn provider(server: &MockServer) -> Provider {
        let config = DispatchConfig::new()
            .with_endpoint(ProviderKind::Gemini, format!("{}/v1beta/models", server.uri()));
        Provider::new(ProviderKind::Gemini, &config, Client::new())
    }

    fn request() -> GenerateRequest {
        GenerateRequest {
            content: "shipping the new release today".to_string(),
            tone: TonePreset::Casual,
            content_type: ContentType::NewPost,
            variation_count: 1,
        }
    }

    #[tokio::test]
    async fn generate_reads_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", "g-key"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "temperature": 0.7, "maxOutputTokens": 500 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "  new release is out ✨ \n" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generated = provider(&server)
            .generate(&request(), "g-key", "gemini-1.5-flash")
            .await
            .unwrap();
        assert_eq!(generated.variation, "new release is out ✨");
        assert_eq!(generated.provider, ProviderKind::Gemini);
        assert_eq!(generated.tone, TonePreset::Casual);
        assert_eq!(generated.character_count, 20);
    }

    #[tokio::test]
    async fn generate_sends_prompt_and_draft_as_one_part() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
            })))
            .mount(&server)
            .await;

        provider(&server)
            .generate(&request(), "g-key", "gemini-1.5-flash")
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("Content type: new-post"));
        assert!(text.ends_with("\n\nOriginal text: shipping the new release today"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate(&request(), "bad", "gemini-1.5-flash")
            .await
            .unwrap_err();
        match err {
            ProviderError::Status { status, body, .. } => {
                assert_eq!(status, 403);
                assert_eq!(body, "API key not valid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_candidates_is_empty_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate(&request(), "g-key", "gemini-1.5-flash")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyCompletion(ProviderKind::Gemini)));
    }

    #[tokio::test]
    async fn validate_key_follows_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(query_param("key", "good"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "maxOutputTokens": 5 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(query_param("key", "bad"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let provider = provider(&server);
        assert!(provider.validate_key("good", "gemini-1.5-flash").await);
        assert!(!provider.validate_key("bad", "gemini-1.5-flash").await);
    }
}
