//! OpenAI-compatible chat-completions client, shared by OpenAI and DeepSeek.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Prompt, ProviderKind, check_status, http_error};
use crate::error::ProviderResult;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for a `/v1/chat/completions` endpoint with bearer auth.
#[derive(Debug, Clone)]
pub struct ChatCompletionsProvider {
    kind: ProviderKind,
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl ChatCompletionsProvider {
    /// Create a client for `kind` posting to `endpoint`.
    pub fn new(kind: ProviderKind, client: Client, endpoint: &str, timeout: Duration) -> Self {
        Self {
            kind,
            client,
            endpoint: endpoint.to_string(),
            timeout,
        }
    }

    async fn send(&self, body: &ChatRequest<'_>, api_key: &str) -> ProviderResult<reqwest::Response> {
        self.client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| http_error(self.kind, e))
    }

    pub(super) async fn complete(
        &self,
        prompt: &Prompt,
        api_key: &str,
        model: &str,
    ) -> ProviderResult<String> {
        let body = ChatRequest {
            model,
            messages: vec![
                Message {
                    role: "system",
                    content: &prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: Some(prompt.temperature),
            max_tokens: prompt.max_tokens,
        };

        let response = self.send(&body, api_key).await?;
        let response = check_status(self.kind, response).await?;
        let parsed: ChatResponse = response.json().await.map_err(|e| http_error(self.kind, e))?;

        tracing::debug!(provider = %self.kind, model, "chat completion received");
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }

    pub(super) async fn probe(&self, api_key: &str, model: &str) -> bool {
        let body = ChatRequest {
            model,
            messages: vec![Message {
                role: "user",
                content: "Hi",
            }],
            temperature: None,
            max_tokens: 5,
        };
        match self.send(&body, api_key).await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(provider = %self.kind, error = %e, "key probe failed");
                false
            }
        }
    }
}
