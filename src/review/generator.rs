//! Chat-completion client used to write the review.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ReviewError;
use crate::review::prompt::SYSTEM_PROMPT;

pub const REVIEW_TEMPERATURE: f32 = 0.3;
pub const REVIEW_MAX_TOKENS: u32 = 2000;

/// Single-shot chat completion: system + user message in, text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ReviewError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    n: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url_chat: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, ReviewError> {
        let base = base_url.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ReviewError::Config(format!(
                "Invalid completion API URL: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder().build()?;
        let url_chat = format!("{}/chat/completions", base);
        info!("Completion client initialized (model {}, endpoint {})", model, url_chat);

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            url_chat,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ReviewError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: REVIEW_TEMPERATURE,
            max_tokens: REVIEW_MAX_TOKENS,
            n: 1,
        };

        debug!("POST {} (prompt {} chars)", self.url_chat, prompt.len());
        let response = self
            .client
            .post(&self.url_chat)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(300).collect();
            return Err(ReviewError::Completion(format!(
                "HTTP {}: {}",
                status, snippet
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ReviewError::Completion("Completion returned no choices".to_string()))
    }
}

/// Turns a rendered prompt into review text with the fixed system instruction.
pub struct ReviewGenerator {
    client: Arc<dyn CompletionClient>,
}

impl ReviewGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ReviewError> {
        self.client.complete(SYSTEM_PROMPT, prompt).await
    }
}
