use serde::{Deserialize, Serialize};

/// Completion endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible chat-completion API.
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Model identifier sent with every request.
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.35,
            top_p: 0.5,
            max_tokens: 1024,
        }
    }
}

/// Transcription endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Base URL of the OpenAI-compatible transcription API.
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    /// Empty for unauthenticated local servers.
    pub api_key_env: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Language hint (ISO 639-1 code, or "auto" to let the server detect).
    pub language: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000/v1".to_string(),
            api_key_env: String::new(),
            model: "whisper-small".to_string(),
            language: "auto".to_string(),
        }
    }
}

/// Streamed-reply pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Delay between successive prefix emissions, in milliseconds.
    pub step_delay_ms: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self { step_delay_ms: 2 }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Interface language tag at startup ("English", "Francais").
    pub language: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub transcription: TranscriptionConfig,
    pub streaming: StreamingConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_reference_generation_parameters() {
        let config = AppConfig::new();
        assert_eq!(config.completion.model, "llama-3.3-70b-versatile");
        assert!((config.completion.temperature - 0.35).abs() < f32::EPSILON);
        assert!((config.completion.top_p - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.completion.max_tokens, 1024);
        assert_eq!(config.streaming.step_delay_ms, 2);
        assert_eq!(config.ui.language, "English");
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str("[completion]\nmodel = \"test-model\"\n").unwrap();
        assert_eq!(config.completion.model, "test-model");
        assert_eq!(config.completion.max_tokens, 1024);
        assert_eq!(config.logging.level, "info");
    }
}
