use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::domain::LanguageModel;
use crate::error::ModelError;

const MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Client for an OpenAI-compatible chat completion endpoint.
///
/// Each call sends the prompt as a single user message. Timeouts, connection
/// failures, HTTP 429 and 5xx responses are retried with exponential backoff;
/// anything else fails immediately.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_retries: u32,
    initial_backoff: Duration,
}

impl ChatCompletionClient {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        })
    }

    /// Reads the API key from the environment variable named in the config.
    pub fn from_env(config: &LlmConfig) -> Result<Self, ModelError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ModelError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    async fn send_once(&self, prompt: &str) -> Result<String, ModelError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ModelError::EmptyResponse)
    }

    fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let mut attempt = 0;
        loop {
            debug!("Sending completion request to {} (attempt {})", self.endpoint, attempt + 1);
            match self.send_once(prompt).await {
                Ok(answer) => return Ok(answer),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.backoff_for(attempt);
                    warn!("Completion request failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_transient() && attempt > 0 => {
                    return Err(ModelError::RetriesExhausted {
                        attempts: attempt + 1,
                        last: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// ==========================================
// REQUEST/RESPONSE TYPES
// ==========================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
