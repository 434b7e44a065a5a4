//! LLM Gateway interface (spec §4.1, §6) — depended upon, not defined here.
//! A concrete adapter lives in `tutor-infra`; tests use an in-memory
//! scripted double.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tutor_types::error::TutorResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Mandatory per-call options (spec §4.1: "mandatory max-output and
/// temperature").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub stop: Vec<String>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_output_tokens: 512,
            temperature: 0.7,
            stop: Vec::new(),
        }
    }
}

/// Single shared client for chat completion and embeddings (spec §4.1). The
/// concrete implementation owns retries, timeouts, and token accounting; the
/// trait only describes the call shape.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], options: &CompletionOptions) -> TutorResult<String>;

    async fn embed(&self, texts: &[String]) -> TutorResult<Vec<Vec<f32>>>;
}
