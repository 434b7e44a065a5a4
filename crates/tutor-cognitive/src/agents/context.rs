//! Context agent (spec §4.3's routing table; see DESIGN.md for why this
//! sixth role exists alongside Analysis): assembles a compact, deterministic
//! summary of session state for the other agents and the Synthesizer, with
//! no learner-visible text and no LLM call.

use async_trait::async_trait;
use serde_json::json;
use tutor_core::{AgentResponse, AgentRole, Classification, ResponseType, Route, SessionState};
use tutor_types::error::TutorResult;

use super::traits::{AgentEnvironment, SharedContext, TutorAgent};

pub struct ContextAgent;

#[async_trait]
impl TutorAgent for ContextAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Context
    }

    async fn process(
        &self,
        state: &SessionState,
        classification: &Classification,
        _route: Route,
        shared_context: &mut SharedContext,
        _env: &AgentEnvironment,
    ) -> TutorResult<AgentResponse> {
        let recent_messages: Vec<&str> = state
            .messages
            .iter()
            .rev()
            .take(4)
            .map(|m| m.text.as_str())
            .collect();

        let summary = json!({
            "domain": state.domain,
            "design_brief": state.design_brief,
            "conversation_phase": state.conversation_phase,
            "dominant_design_dimensions": classification.dominant_design_dimensions,
            "recent_messages": recent_messages,
            "learner_message_count": state.learner_message_count(),
        });
        shared_context.insert("turn_context", summary.clone());

        Ok(AgentResponse::new(AgentRole::Context, ResponseType::Analysis, String::new())
            .with_metadata("turn_context", summary))
    }
}
