//! Knowledge Store interface (spec §4.4, §6) — depended upon, not defined
//! here. Semantic search over the architectural corpus plus an optional web
//! search adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tutor_types::error::TutorResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSnippet {
    pub snippet: String,
    pub source: String,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: String,
    /// Returned verbatim from the search backend; the Domain agent must
    /// never fabricate a URL (spec §4.4).
    pub url: String,
    pub snippet: String,
}

#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn search(&self, query: &str, k: usize) -> TutorResult<Vec<KnowledgeSnippet>>;

    /// Optional web-search escalation when corpus search is insufficient
    /// (spec §4.4). Default: unsupported.
    async fn web_search(&self, _query: &str) -> TutorResult<Vec<WebSearchResult>> {
        Ok(Vec::new())
    }
}
