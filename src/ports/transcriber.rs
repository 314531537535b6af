use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Result of transcribing one audio clip.
///
/// An empty `text` is a legitimate outcome (silence, noise); failure is
/// signaled through the error channel instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Transcribed text.
    pub text: String,
    /// Detected language (ISO 639-1 code), when the backend reports one.
    pub detected_language: Option<String>,
    /// Transcription duration in milliseconds.
    pub duration_ms: u64,
}

/// Port for the speech-to-text boundary.
///
/// Implementations convert an audio clip reference to plain text using
/// whatever backend they wrap (HTTP whisper server, cloud API, ...).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the clip at `clip`, optionally hinting the language
    /// (ISO 639-1 code).
    async fn transcribe(
        &self,
        clip: &Path,
        language: Option<&str>,
    ) -> Result<Transcript, DomainError>;
}
