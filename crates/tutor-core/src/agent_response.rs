//! `AgentResponse` entity (spec §3, §4.4).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The six agent roles named across the routing table (spec §4.3). `Context`
/// is a lightweight context-assembly step distinct from `Analysis` (spec
/// §4.3's `multi_agent_comprehensive` route lists both in one agent chain);
/// see DESIGN.md for the resolution of this naming gap against spec §2/§4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Analysis,
    Context,
    Domain,
    Socratic,
    Cognitive,
    Synthesizer,
}

impl AgentRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentRole::Analysis => "analysis",
            AgentRole::Context => "context",
            AgentRole::Domain => "domain",
            AgentRole::Socratic => "socratic",
            AgentRole::Cognitive => "cognitive",
            AgentRole::Synthesizer => "synthesizer",
        }
    }
}

/// Closed set of response shapes an agent may emit (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Analysis,
    Knowledge,
    Socratic,
    Challenge,
    Synthesis,
    Scaffolding,
    Gamified,
}

/// Closed set of cognitive flags an agent may raise (spec §3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveFlag {
    AgentUnavailable,
    OffloadingAttempt,
    Overconfidence,
    Confusion,
    DeepEngagement,
    GamifiedChallenge,
}

/// Proposed mutation to phase/milestone progress, applied atomically by the
/// Orchestrator/Tracker (spec §4.4, §4.5) — agents never mutate state
/// directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub milestone_deltas: HashMap<String, f32>,
    pub phase_progress_delta: f32,
    pub readiness_signal: bool,
    pub milestone_questions_asked: u32,
    pub milestone_responses_graded: u32,
}

/// One agent's partial contribution to a turn (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentResponse {
    pub agent: AgentRole,
    pub response_type: ResponseType,
    pub response_text: String,
    pub cognitive_flags: Vec<CognitiveFlag>,
    pub enhancement_metrics: HashMap<String, f32>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub progress_update: ProgressUpdate,
}

/// Upper bound on `metadata` entries (spec §3 invariant: metadata size
/// bounded).
pub const MAX_METADATA_ENTRIES: usize = 32;

impl AgentResponse {
    pub fn new(agent: AgentRole, response_type: ResponseType, response_text: impl Into<String>) -> Self {
        Self {
            agent,
            response_type,
            response_text: response_text.into(),
            cognitive_flags: Vec::new(),
            enhancement_metrics: HashMap::new(),
            metadata: HashMap::new(),
            progress_update: ProgressUpdate::default(),
        }
    }

    /// A minimal response for the soft-failure path (spec §4.4): a timeout
    /// or malformed LLM JSON from a non-synthesizer agent does not abort the
    /// turn, it degrades to this.
    pub fn unavailable(agent: AgentRole, response_type: ResponseType) -> Self {
        let mut response = Self::new(agent, response_type, String::new());
        response.cognitive_flags.push(CognitiveFlag::AgentUnavailable);
        response
    }

    pub fn with_flag(mut self, flag: CognitiveFlag) -> Self {
        if !self.cognitive_flags.contains(&flag) {
            self.cognitive_flags.push(flag);
        }
        self
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: f32) -> Self {
        self.enhancement_metrics.insert(key.into(), value.clamp(0.0, 1.0));
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        if self.metadata.len() < MAX_METADATA_ENTRIES {
            self.metadata.insert(key.into(), value);
        }
        self
    }

    pub fn with_progress_update(mut self, update: ProgressUpdate) -> Self {
        self.progress_update = update;
        self
    }

    pub fn is_unavailable(&self) -> bool {
        self.cognitive_flags.contains(&CognitiveFlag::AgentUnavailable)
    }

    /// Spec §3 invariant: `response_text` non-empty — except for the
    /// Analysis agent on routes other than `multi_agent_comprehensive`,
    /// which is explicitly allowed to have no user-visible text (spec
    /// §4.4), and the soft-failure `unavailable` path.
    pub fn has_visible_text(&self) -> bool {
        !self.response_text.trim().is_empty()
    }
}
