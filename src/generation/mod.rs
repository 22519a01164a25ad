//! Text-generation API seam and its OpenAI implementation.

pub mod client;
pub mod openai;

pub use client::{ApiError, Choice, CompletionClient, CompletionRequest, CompletionResponse};
pub use openai::{OpenAiClient, API_KEY_ENV};
