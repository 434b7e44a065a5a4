//! Concrete adapters for the trait boundaries `tutor-core` defines
//! (`LlmGateway`, `KnowledgeStore`, `VisualAnalyzer`) plus the in-process
//! session State Store and JSON session export.

pub mod connection;
pub mod export;
pub mod http;
pub mod knowledge_store;
pub mod llm_gateway;
pub mod rate_limiter;
pub mod state_store;
pub mod visual_analyzer;

pub use connection::ConnectionConfig;
pub use export::{build_session_export, MetricSeriesPoint, SessionExport};
pub use http::HttpClient;
pub use knowledge_store::HttpKnowledgeStore;
pub use llm_gateway::HttpLlmGateway;
pub use rate_limiter::RateLimiter;
pub use state_store::StateStore;
pub use visual_analyzer::HttpVisualAnalyzer;

use std::sync::Arc;
use std::time::Duration;

use tutor_core::{KnowledgeStore, LlmGateway, VisualAnalyzer};
use tutor_types::config::LlmConfig;

/// Wire up the three HTTP-backed collaborators from deployment connection
/// settings and the pedagogical engine's `llm.*` config (spec §6).
pub fn build_default_adapters(
    connection: &ConnectionConfig,
    llm_config: &LlmConfig,
) -> (Arc<dyn LlmGateway>, Arc<dyn KnowledgeStore>, Arc<dyn VisualAnalyzer>) {
    let timeout = Duration::from_secs(llm_config.timeout_s);
    let mut llm_http = HttpClient::new(connection.llm_base_url.clone(), timeout);
    if let Some(api_key) = &connection.llm_api_key {
        llm_http = llm_http.with_header("Authorization", format!("Bearer {api_key}"));
    }
    let rate_limiter = RateLimiter::per_minute(60, 10);
    let llm = Arc::new(HttpLlmGateway::new(llm_http, rate_limiter, llm_config.model.clone(), llm_config.retry_budget));

    let corpus_http = HttpClient::new(connection.knowledge_base_url.clone(), timeout);
    let mut knowledge = HttpKnowledgeStore::new(corpus_http);
    if let Some(web_search_url) = &connection.web_search_base_url {
        knowledge = knowledge.with_web_search(HttpClient::new(web_search_url.clone(), timeout));
    }
    let knowledge: Arc<dyn KnowledgeStore> = Arc::new(knowledge);

    let vision_http = HttpClient::new(connection.vision_base_url.clone(), timeout);
    let visual_analyzer: Arc<dyn VisualAnalyzer> = Arc::new(HttpVisualAnalyzer::new(vision_http));

    (llm, knowledge, visual_analyzer)
}
