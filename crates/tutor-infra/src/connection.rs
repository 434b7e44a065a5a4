//! Outbound service endpoints for the HTTP adapters, read from the
//! environment at process startup. Kept separate from `TutorConfig`
//! (tutor-types) because these are deployment wiring, not pedagogical
//! engine behavior.

use std::env;

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub llm_base_url: String,
    pub llm_api_key: Option<String>,
    pub knowledge_base_url: String,
    pub web_search_base_url: Option<String>,
    pub vision_base_url: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            llm_base_url: "http://localhost:11434/v1".to_string(),
            llm_api_key: None,
            knowledge_base_url: "http://localhost:8090".to_string(),
            web_search_base_url: None,
            vision_base_url: "http://localhost:8091".to_string(),
        }
    }
}

impl ConnectionConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("TUTOR_LLM_BASE_URL") {
            config.llm_base_url = url;
        }
        config.llm_api_key = env::var("TUTOR_LLM_API_KEY").ok();
        if let Ok(url) = env::var("TUTOR_KNOWLEDGE_BASE_URL") {
            config.knowledge_base_url = url;
        }
        config.web_search_base_url = env::var("TUTOR_WEB_SEARCH_BASE_URL").ok();
        if let Ok(url) = env::var("TUTOR_VISION_BASE_URL") {
            config.vision_base_url = url;
        }
        config
    }
}
