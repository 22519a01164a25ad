//! Text-generation settings for curriculum runs.

use serde::{Deserialize, Serialize};

/// Model parameters and curriculum shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Completion model name.
    pub model: String,
    /// Token limit per completion.
    pub max_tokens: u32,
    /// Categories requested for a topic.
    pub category_count: usize,
    /// Subtopics requested per category.
    pub subtopic_count: usize,
    /// Base URL of the completions API.
    pub api_base_url: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "text-davinci-002".into(),
            max_tokens: 1024,
            category_count: 30,
            subtopic_count: 10,
            api_base_url: "https://api.openai.com/v1".into(),
        }
    }
}

impl GenerationConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".into());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".into());
        }
        if self.category_count == 0 {
            return Err("category_count must be greater than 0".into());
        }
        if self.subtopic_count == 0 {
            return Err("subtopic_count must be greater than 0".into());
        }
        if self.api_base_url.trim().is_empty() {
            return Err("api_base_url must not be empty".into());
        }
        Ok(())
    }
}
