//! HTTP-backed `LlmGateway` adapter (spec §4.1, §6): a single shared client
//! talking to an OpenAI-compatible chat-completions endpoint, with a
//! per-process rate limiter and a bounded retry budget.

use async_trait::async_trait;
use serde_json::{json, Value};

use tutor_core::gateway::{ChatMessage, CompletionOptions, LlmGateway};
use tutor_types::error::{TutorError, TutorResult};

use crate::http::{ensure_success, HttpClient};
use crate::rate_limiter::RateLimiter;

pub struct HttpLlmGateway {
    http: HttpClient,
    rate_limiter: RateLimiter,
    model: String,
    retry_budget: u32,
}

impl HttpLlmGateway {
    pub fn new(http: HttpClient, rate_limiter: RateLimiter, model: impl Into<String>, retry_budget: u32) -> Self {
        Self { http, rate_limiter, model: model.into(), retry_budget }
    }

    async fn complete_once(&self, messages: &[ChatMessage], options: &CompletionOptions) -> TutorResult<String> {
        self.rate_limiter.check()?;
        let body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": options.max_output_tokens,
            "temperature": options.temperature,
            "stop": options.stop,
        });
        let response = self.http.post_json("chat/completions", &body).await?;
        let response = ensure_success(response, "LLM chat completion").await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|e| TutorError::ProviderMalformed(format!("non-JSON chat completion response: {e}")))?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TutorError::ProviderMalformed("chat completion response missing choices[0].message.content".to_string()))
    }
}

#[async_trait]
impl LlmGateway for HttpLlmGateway {
    async fn complete(&self, messages: &[ChatMessage], options: &CompletionOptions) -> TutorResult<String> {
        let mut attempt = 0;
        loop {
            match self.complete_once(messages, options).await {
                Ok(text) => return Ok(text),
                Err(error) if error.retryable() && attempt < self.retry_budget => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %error, "retrying LLM completion");
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn embed(&self, texts: &[String]) -> TutorResult<Vec<Vec<f32>>> {
        self.rate_limiter.check()?;
        let body = json!({ "model": self.model, "input": texts });
        let response = self.http.post_json("embeddings", &body).await?;
        let response = ensure_success(response, "LLM embeddings").await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|e| TutorError::ProviderMalformed(format!("non-JSON embeddings response: {e}")))?;
        let data = payload["data"]
            .as_array()
            .ok_or_else(|| TutorError::ProviderMalformed("embeddings response missing data[]".to_string()))?;
        data.iter()
            .map(|entry| {
                entry["embedding"]
                    .as_array()
                    .map(|vec| vec.iter().filter_map(|v| v.as_f64()).map(|v| v as f32).collect())
                    .ok_or_else(|| TutorError::ProviderMalformed("embedding entry missing embedding[]".to_string()))
            })
            .collect()
    }
}
