//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use super::normalize::normalize_label;
use super::prompt::{system_prompt, user_prompt};
use super::{ClassificationRequest, ContentClassifier};
use crate::config::ClassifierConfig;
use crate::error::{ColscanError, ColscanResult};
use crate::models::NOT_APPLICABLE;

const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Classifier over `{base_url}/chat/completions`
///
/// Serves both `openai` and `ollama`; the provider only changes the default
/// endpoint and whether a bearer token is sent. The per-call deadline is
/// owned by the worker pool, not the HTTP client.
pub struct OpenAiClassifier {
    config: ClassifierConfig,
    http_client: Client,
}

impl OpenAiClassifier {
    pub fn new(config: ClassifierConfig) -> ColscanResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                ColscanError::classifier_with_provider(
                    format!("Failed to build HTTP client: {}", e),
                    config.provider.as_str(),
                )
            })?;
        Ok(Self::with_client(config, http_client))
    }

    pub fn with_client(config: ClassifierConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    #[instrument(skip(self, request), fields(provider = %self.config.provider, column = %request.column_name), level = "debug")]
    async fn chat(&self, request: &ClassificationRequest) -> ColscanResult<String> {
        let labels = request.allowed_labels();
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(labels),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(&request.column_name, &request.samples),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: 0.0,
        };
        debug!(prompt = %body.messages[1].content, "sending classification request");

        let url = format!("{}/chat/completions", self.config.base_url());
        let mut http_request = self.http_client.post(&url).json(&body);
        if let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ColscanError::classifier_with_provider(
                format!(
                    "API error (status {}): {}",
                    status,
                    truncate(error_text.trim(), MAX_ERROR_BODY_CHARS)
                ),
                self.provider(),
            ));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ColscanError::classifier_with_provider(
                format!("Failed to parse response: {}", e),
                self.provider(),
            )
        })?;

        let Some(raw) = parsed.choices.into_iter().next().and_then(|c| c.message.content) else {
            debug!("response carried no choices");
            return Ok(NOT_APPLICABLE.to_string());
        };

        let label = normalize_label(&raw, labels);
        debug!(raw = %raw, label = %label, "model answered");
        Ok(label)
    }
}

#[async_trait]
impl ContentClassifier for OpenAiClassifier {
    fn provider(&self) -> &str {
        self.config.provider.as_str()
    }

    async fn classify(&self, request: &ClassificationRequest) -> ColscanResult<String> {
        self.chat(request).await
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
