//! Completion service clients
//!
//! [`CompletionService`] is the seam between the rebuttal engine and the
//! external text-generation API. [`OpenAiCompletionClient`] talks to an
//! OpenAI-compatible chat-completions endpoint; [`testing`] holds in-process
//! doubles.

mod openai;
pub mod testing;

pub use openai::{CompletionSettings, OpenAiCompletionClient};

use crate::contracts::RebuttalCandidate;

/// Completion client errors
///
/// Every variant is recoverable: the engine answers with the fallback.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Completion service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode completion response: {0}")]
    Decode(String),

    #[error("Completion response had no message content")]
    EmptyContent,

    #[error("Completion content is not a JSON object: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Short label for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            CompletionError::Network(_) => "network",
            CompletionError::Status { .. } => "status",
            CompletionError::Decode(_) => "decode",
            CompletionError::EmptyContent => "empty_content",
            CompletionError::Malformed(_) => "malformed",
        }
    }
}

/// One structured-output completion call
///
/// Implementations make a single attempt. The caller falls back instead of
/// retrying.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    /// Send `prompt` and return the object the model produced
    async fn complete(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<RebuttalCandidate, CompletionError>;
}

/// Parse model output into a candidate
///
/// The content must be a JSON object. Surrounding whitespace is tolerated.
pub fn parse_candidate(content: &str) -> Result<RebuttalCandidate, CompletionError> {
    if content.trim().is_empty() {
        return Err(CompletionError::EmptyContent);
    }

    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| CompletionError::Malformed(e.to_string()))?;

    RebuttalCandidate::from_value(value)
        .ok_or_else(|| CompletionError::Malformed("expected an object".to_string()))
}
