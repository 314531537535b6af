use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Message};

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
    pub max_tokens: u32,
    /// The service is always asked for one complete response; incremental
    /// delivery is simulated on our side.
    pub stream: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.35,
            top_p: 0.5,
            max_tokens: 1024,
            stream: false,
        }
    }
}

/// Port for the hosted language-model inference boundary.
///
/// Implementations take an ordered message list and return one complete
/// assistant response. The same port serves both the main dialogue turn and
/// the single-message title-derivation call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request one complete assistant response for the given history.
    async fn complete(
        &self,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<String, DomainError>;
}
