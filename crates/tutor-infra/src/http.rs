//! Thin HTTP client wrapper shared by the LLM Gateway, Knowledge Store, and
//! Visual Analyzer adapters.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;

use tutor_types::error::{TutorError, TutorResult};

pub struct HttpClient {
    client: Client,
    base_url: String,
    default_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");
        Self { client, base_url: base_url.into(), default_headers: HashMap::new() }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn map_send_error(source: &str, error: reqwest::Error) -> TutorError {
        if error.is_timeout() {
            TutorError::ProviderTimeout(format!("{source} request timed out: {error}"))
        } else {
            TutorError::ProviderUnavailable(format!("{source} request failed: {error}"))
        }
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TutorResult<Response> {
        let url = self.build_url(path);
        let mut request = self.client.post(&url).json(body);
        for (key, value) in &self.default_headers {
            request = request.header(key, value);
        }
        request.send().await.map_err(|e| Self::map_send_error("POST", e))
    }

    pub async fn get(&self, path: &str) -> TutorResult<Response> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        for (key, value) in &self.default_headers {
            request = request.header(key, value);
        }
        request.send().await.map_err(|e| Self::map_send_error("GET", e))
    }
}

/// Turn a non-2xx response into the matching `TutorError` variant.
pub async fn ensure_success(response: Response, source: &str) -> TutorResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if status.as_u16() == 429 {
        return Err(TutorError::ProviderQuota(format!("{source} returned 429: {body}")));
    }
    if status.is_server_error() {
        return Err(TutorError::ProviderUnavailable(format!("{source} returned {status}: {body}")));
    }
    Err(TutorError::ProviderMalformed(format!("{source} returned {status}: {body}")))
}
