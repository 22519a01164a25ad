//! OpenAI completions backend over HTTP.

use async_trait::async_trait;

use crate::generation::client::{ApiError, CompletionClient, CompletionRequest, CompletionResponse};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Client for the `/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Client for `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Read the key from `OPENAI_API_KEY` in the process environment.
    ///
    /// `.env` files are not read here; the binary loads them at startup.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingApiKey` when the variable is unset or empty.
    pub fn from_env(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_key(base_url, std::env::var(API_KEY_ENV).ok())
    }

    fn with_key(base_url: impl Into<String>, key: Option<String>) -> Result<Self, ApiError> {
        let key = key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ApiError::MissingApiKey(API_KEY_ENV))?;
        Ok(Self::new(base_url, key))
    }

    /// Completions endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn create_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ApiError> {
        tracing::debug!(model = %request.model, max_tokens = request.max_tokens, "requesting completion");

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}
