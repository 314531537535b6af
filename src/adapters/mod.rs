pub mod chat_completion;
pub mod config_store;
pub mod whisper_http;

pub use chat_completion::ChatCompletionClient;
pub use config_store::TomlConfigStore;
pub use whisper_http::WhisperHttpTranscriber;
