use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::domain::config::TranscriptionConfig;
use crate::domain::DomainError;
use crate::ports::{Transcriber, Transcript};

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

/// Transcriber backed by an OpenAI-compatible `/audio/transcriptions`
/// endpoint (a local whisper server in the reference deployment).
pub struct WhisperHttpTranscriber {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
}

impl WhisperHttpTranscriber {
    /// Create a transcriber from configuration. An empty `api_key_env`
    /// means the endpoint is unauthenticated (local server).
    pub fn new(config: &TranscriptionConfig) -> Result<Self, DomainError> {
        let api_key = if config.api_key_env.is_empty() {
            None
        } else {
            Some(std::env::var(&config.api_key_env).map_err(|_| {
                DomainError::Config(format!(
                    "Transcription API key not found in environment variable '{}'",
                    config.api_key_env
                ))
            })?)
        };

        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(format!("SousChef/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = Url::parse(&format!(
            "{}/audio/transcriptions",
            config.api_base.trim_end_matches('/')
        ))
        .map_err(|e| DomainError::Config(format!("Invalid transcription api_base: {}", e)))?;

        info!(endpoint = %endpoint, model = %config.model, "WhisperHttpTranscriber created");

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperHttpTranscriber {
    async fn transcribe(
        &self,
        clip: &Path,
        language: Option<&str>,
    ) -> Result<Transcript, DomainError> {
        let bytes = tokio::fs::read(clip)
            .await
            .map_err(|e| DomainError::Transcription(format!("Cannot read clip {:?}: {}", clip, e)))?;

        if bytes.is_empty() {
            return Ok(Transcript {
                text: String::new(),
                detected_language: None,
                duration_ms: 0,
            });
        }

        let filename = clip
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip.wav".to_string());

        debug!(clip = ?clip, bytes = bytes.len(), "Starting transcription");
        let start = std::time::Instant::now();

        let mut form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename))
            .text("model", self.model.clone());
        if let Some(lang) = language.filter(|l| *l != "auto") {
            form = form.text("language", lang.to_string());
        }

        let mut request = self.client.post(self.endpoint.clone()).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Transcription(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Transcription(format!(
                "HTTP {} from transcription endpoint: {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Transcription(e.to_string()))?;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            chars = parsed.text.chars().count(),
            duration_ms = duration_ms,
            "Transcription finished"
        );

        Ok(Transcript {
            text: parsed.text,
            detected_language: parsed.language,
            duration_ms,
        })
    }
}
