//! OpenAI-compatible chat completions HTTP client.

use crate::config::OpenAiConfig;
use crate::error::OpenAiError;
use crate::types::*;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Default retry configuration
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 100;
const DEFAULT_MAX_BACKOFF_MS: u64 = 5000;

/// Chat completions client.
///
/// The API key is stored using `SecretString` to prevent accidental
/// exposure in logs or debug output.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl OpenAiClient {
    /// Create a new client.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OpenAiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into()),
            model: model.into(),
        })
    }

    /// Create a client from service configuration.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, OpenAiError> {
        Self::new(
            config.api_key.expose_secret().clone(),
            config.base_url.clone(),
            config.model.clone(),
            config.timeout,
        )
    }

    /// Get the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion request and return the text of the first choice.
    #[instrument(skip(self, messages), fields(message_count = messages.len()))]
    pub async fn chat(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Result<String, OpenAiError> {
        let response = self
            .chat_with_tools(messages, temperature, max_tokens, None)
            .await?;

        response
            .content
            .filter(|content| !content.is_empty())
            .ok_or(OpenAiError::EmptyResponse)
    }

    /// Send a chat completion request offering the given tools.
    ///
    /// Tools are left out of the request entirely when `None` or empty.
    #[instrument(skip(self, messages, tools), fields(message_count = messages.len()))]
    pub async fn chat_with_tools(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatResponseWithTools, OpenAiError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
            tools: tools.filter(|t| !t.is_empty()),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await?;

        let chat_response = self.handle_response::<ChatResponse>(response).await?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or(OpenAiError::EmptyResponse)?;

        debug!(
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            tool_calls = choice.message.tool_calls.as_ref().map_or(0, Vec::len),
            "Chat completion received"
        );

        Ok(ChatResponseWithTools {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".into()),
            usage: chat_response.usage,
        })
    }

    /// List available models.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<Model>, OpenAiError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await?;

        self.handle_response::<ModelsResponse>(response)
            .await
            .map(|r| r.data)
    }

    /// Send a chat completion request with automatic retry and exponential backoff.
    ///
    /// Retries on transient errors (network issues, rate limits) up to `max_retries` times.
    /// Does not retry on authentication errors or empty responses.
    #[instrument(skip(self, messages), fields(message_count = messages.len()))]
    pub async fn chat_with_retry(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        max_retries: Option<u32>,
    ) -> Result<String, OpenAiError> {
        let max_retries = max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        let mut backoff_ms = DEFAULT_INITIAL_BACKOFF_MS;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            if attempt > 0 {
                debug!("Retry attempt {} after {}ms backoff", attempt, backoff_ms);
                sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = (backoff_ms * 2).min(DEFAULT_MAX_BACKOFF_MS);
            }

            match self.chat(messages, temperature, max_tokens).await {
                Ok(response) => return Ok(response),
                Err(OpenAiError::Unauthorized) => return Err(OpenAiError::Unauthorized),
                Err(OpenAiError::EmptyResponse) => return Err(OpenAiError::EmptyResponse),
                Err(e) => {
                    warn!("Chat request failed (attempt {}): {}", attempt + 1, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(OpenAiError::Api {
            status: 0,
            message: "Max retries exceeded".into(),
        }))
    }

    /// Health check - returns true if API is reachable.
    pub async fn health_check(&self) -> bool {
        self.list_models().await.is_ok()
    }

    /// Handle HTTP response, converting errors appropriately.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, OpenAiError> {
        if response.status().is_success() {
            let body = response.text().await?;
            debug!("Response body: {}", truncate_for_log(&body, 200));
            serde_json::from_str(&body).map_err(OpenAiError::from)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract error information from failed response.
    async fn extract_error(&self, response: reqwest::Response) -> OpenAiError {
        let status = response.status();

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Rate limit exceeded");
                OpenAiError::RateLimit
            }
            StatusCode::UNAUTHORIZED => {
                warn!("Authentication failed");
                OpenAiError::Unauthorized
            }
            _ => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".into());
                OpenAiError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

fn truncate_for_log(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
