//! Domain agent (spec §4.4): grounds a reply in retrieved knowledge or
//! precedent examples, never fabricating a source URL.

use async_trait::async_trait;
use serde_json::json;
use tutor_core::{
    AgentResponse, AgentRole, ChatMessage, Classification, CompletionOptions, KnowledgeSnippet, ResponseType,
    Route, SessionState, WebSearchResult,
};
use tutor_types::error::TutorResult;

use super::traits::{AgentEnvironment, SharedContext, TutorAgent};

pub struct DomainAgent;

fn build_topic(classification: &Classification, state: &SessionState) -> String {
    let dimensions: Vec<&str> = classification
        .dominant_design_dimensions
        .iter()
        .map(|d| match d {
            tutor_core::DesignDimension::Functional => "functional program",
            tutor_core::DesignDimension::Spatial => "spatial organization",
            tutor_core::DesignDimension::Technical => "technical systems",
            tutor_core::DesignDimension::Contextual => "site context",
            tutor_core::DesignDimension::Aesthetic => "aesthetic language",
            tutor_core::DesignDimension::Sustainable => "sustainability strategy",
        })
        .collect();
    if dimensions.is_empty() {
        format!("{} design in the {:?} phase", state.domain, state.design_phase)
    } else {
        format!("{} for a {} project", dimensions.join(" and "), state.domain)
    }
}

fn format_sources(snippets: &[KnowledgeSnippet], web_results: &[WebSearchResult]) -> String {
    let mut lines = Vec::new();
    for snippet in snippets.iter().take(3) {
        lines.push(format!("- {} (source: {})", snippet.snippet, snippet.source));
    }
    for result in web_results.iter().take(3usize.saturating_sub(lines.len())) {
        lines.push(format!("- {}: {} ({})", result.title, result.snippet, result.url));
    }
    lines.join("\n")
}

#[async_trait]
impl TutorAgent for DomainAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Domain
    }

    async fn process(
        &self,
        state: &SessionState,
        classification: &Classification,
        route: Route,
        shared_context: &mut SharedContext,
        env: &AgentEnvironment,
    ) -> TutorResult<AgentResponse> {
        let topic = build_topic(classification, state);
        let snippets = env.knowledge.search(&topic, 3).await.unwrap_or_default();

        let mut web_results = Vec::new();
        let mut ai_generated = false;
        if snippets.len() < 2 {
            web_results = env.knowledge.web_search(&topic).await.unwrap_or_default();
        }
        if snippets.is_empty() && web_results.is_empty() {
            ai_generated = true;
        }

        let sources_block = format_sources(&snippets, &web_results);
        let suppress_socratic = route == Route::KnowledgeOnly;

        let prompt = format!(
            "You are the domain-knowledge agent in an architecture tutoring session. Topic: {topic}. \
             Learner's design brief: {:?}. Grounded sources (use verbatim if present, otherwise note these \
             are illustrative and not retrieved):\n{sources_block}\n\
             Write up to 3 concrete examples or facts relevant to the topic, each on its own line, citing the \
             given source when one exists. {} Keep it factual, no Socratic question.",
            state.design_brief,
            if suppress_socratic { "Do not ask a follow-up question." } else { "" }
        );
        let options = CompletionOptions { max_output_tokens: 400, temperature: 0.4, ..CompletionOptions::default() };
        let messages = vec![ChatMessage::system("Respond with plain prose, no markdown headers."), ChatMessage::user(prompt)];

        let response_text = match env.llm.complete(&messages, &options).await {
            Ok(text) => text.trim().to_string(),
            Err(error) if error.retryable() => {
                return Ok(AgentResponse::unavailable(AgentRole::Domain, ResponseType::Knowledge));
            }
            Err(error) => return Err(error),
        };

        shared_context.insert(
            "domain_sources",
            json!({ "snippets": snippets, "web_results": web_results, "ai_generated": ai_generated }),
        );

        Ok(AgentResponse::new(AgentRole::Domain, ResponseType::Knowledge, response_text)
            .with_metadata("ai_generated", json!(ai_generated))
            .with_metadata("source_count", json!(snippets.len() + web_results.len())))
    }
}
