use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::domain::config::CompletionConfig;
use crate::domain::{DomainError, Message};
use crate::ports::{CompletionClient, GenerationParams};

/// Chat-completion request in OpenAI-compatible wire shape.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    top_p: f32,
    max_completion_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Completion client for an OpenAI-compatible chat endpoint
/// (a Groq-hosted model in the reference deployment).
pub struct ChatCompletionClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    /// Create a client from configuration. The API key is read from the
    /// environment variable named in the config, never stored in the file.
    pub fn new(config: &CompletionConfig) -> Result<Self, DomainError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            DomainError::Config(format!(
                "Completion API key not found in environment variable '{}'",
                config.api_key_env
            ))
        })?;

        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(format!("SousChef/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            config.api_base.trim_end_matches('/')
        ))
        .map_err(|e| DomainError::Config(format!("Invalid completion api_base: {}", e)))?;

        info!(endpoint = %endpoint, model = %config.model, "ChatCompletionClient created");

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(
        &self,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<String, DomainError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            top_p: params.top_p,
            max_completion_tokens: params.max_tokens,
            stream: params.stream,
        };

        debug!(messages = messages.len(), model = %self.model, "Requesting completion");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Completion(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Completion(format!(
                "HTTP {} from completion endpoint: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Completion(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                DomainError::Completion("Completion response contained no choices".to_string())
            })?;

        debug!(chars = content.chars().count(), "Completion received");
        Ok(content)
    }
}
