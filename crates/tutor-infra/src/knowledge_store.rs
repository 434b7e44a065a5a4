//! HTTP-backed `KnowledgeStore` adapter (spec §4.4, §6): semantic search
//! over the architectural corpus, with an optional web-search escalation
//! backend.

use async_trait::async_trait;
use serde_json::{json, Value};

use tutor_core::knowledge::{KnowledgeSnippet, KnowledgeStore, WebSearchResult};
use tutor_types::error::{TutorError, TutorResult};

use crate::http::{ensure_success, HttpClient};

pub struct HttpKnowledgeStore {
    corpus: HttpClient,
    web_search: Option<HttpClient>,
}

impl HttpKnowledgeStore {
    pub fn new(corpus: HttpClient) -> Self {
        Self { corpus, web_search: None }
    }

    pub fn with_web_search(mut self, web_search: HttpClient) -> Self {
        self.web_search = Some(web_search);
        self
    }
}

#[async_trait]
impl KnowledgeStore for HttpKnowledgeStore {
    async fn search(&self, query: &str, k: usize) -> TutorResult<Vec<KnowledgeSnippet>> {
        let body = json!({ "query": query, "k": k });
        let response = self.corpus.post_json("search", &body).await?;
        let response = ensure_success(response, "knowledge corpus search").await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|e| TutorError::ProviderMalformed(format!("non-JSON corpus search response: {e}")))?;
        let results = payload["results"]
            .as_array()
            .ok_or_else(|| TutorError::ProviderMalformed("corpus search response missing results[]".to_string()))?;
        results
            .iter()
            .map(|entry| {
                serde_json::from_value::<KnowledgeSnippet>(entry.clone())
                    .map_err(|e| TutorError::ProviderMalformed(format!("malformed knowledge snippet: {e}")))
            })
            .collect()
    }

    async fn web_search(&self, query: &str) -> TutorResult<Vec<WebSearchResult>> {
        let Some(backend) = &self.web_search else {
            return Ok(Vec::new());
        };
        let body = json!({ "query": query });
        let response = backend.post_json("search", &body).await?;
        let response = ensure_success(response, "web search").await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|e| TutorError::ProviderMalformed(format!("non-JSON web search response: {e}")))?;
        let results = payload["results"]
            .as_array()
            .ok_or_else(|| TutorError::ProviderMalformed("web search response missing results[]".to_string()))?;
        results
            .iter()
            .map(|entry| {
                serde_json::from_value::<WebSearchResult>(entry.clone())
                    .map_err(|e| TutorError::ProviderMalformed(format!("malformed web search result: {e}")))
            })
            .collect()
    }
}
