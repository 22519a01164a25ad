//! Completion request/response models and the client seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by a completion backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("api returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if readable.
        body: String,
    },
    /// No API key was configured.
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Text completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model name.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Token limit for the completion.
    pub max_tokens: u32,
}

/// One generated alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Generated text.
    pub text: String,
}

/// Text completion response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated alternatives, best first.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl CompletionResponse {
    /// Response carrying a single choice.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice { text: text.into() }],
        }
    }

    /// Text of the first choice.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

/// Abstraction over a text-generation API.
///
/// The scheduler treats calls made through this trait as opaque: it only
/// sees success or failure.
#[async_trait]
pub trait CompletionClient: Send + Sync + 'static {
    /// Request a completion.
    async fn create_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ApiError>;
}
