//! The shared per-agent contract (spec §4.4), generalized from the
//! teacher's `BrainAgent` trait (`execute(input, context) -> output`,
//! metadata, confidence threshold) to this system's fixed five-role roster.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tutor_core::{
    AgentResponse, AgentRole, Classification, LlmGateway, Route, SessionState,
};
use tutor_types::config::TutorConfig;
use tutor_types::error::TutorResult;

/// Cross-agent scratch space for one turn (spec §3's `agent_context`,
/// scoped to a single turn rather than persisted verbatim — anything an
/// agent wants to survive into the next turn is proposed back through
/// `SessionState.agent_context` via the Orchestrator).
#[derive(Debug, Clone, Default)]
pub struct SharedContext {
    values: HashMap<String, serde_json::Value>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    pub fn visual_insights(&self) -> Option<&serde_json::Value> {
        self.get("visual_insights")
    }
}

/// Everything an agent needs besides the learner's classified turn: the
/// gateway to call the LLM, the knowledge store (only the Domain agent uses
/// it directly), and engine configuration.
pub struct AgentEnvironment {
    pub llm: Arc<dyn LlmGateway>,
    pub knowledge: Arc<dyn tutor_core::KnowledgeStore>,
    pub config: TutorConfig,
}

/// The contract every pedagogical agent implements (spec §4.4). Agents may
/// read `state` but never mutate it directly — any state change is proposed
/// via `AgentResponse.progress_update` and applied atomically by the
/// Orchestrator/Tracker.
#[async_trait]
pub trait TutorAgent: Send + Sync {
    fn role(&self) -> AgentRole;

    async fn process(
        &self,
        state: &SessionState,
        classification: &Classification,
        route: Route,
        shared_context: &mut SharedContext,
        env: &AgentEnvironment,
    ) -> TutorResult<AgentResponse>;
}
