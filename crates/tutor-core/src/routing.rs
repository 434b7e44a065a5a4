//! `RoutingDecision` entity and the closed `Route` set (spec §3, §4.3).

use serde::{Deserialize, Serialize};

use crate::agent_response::AgentRole;

/// Closed set of pedagogical routes the Router may select (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    ProgressiveOpening,
    TopicTransition,
    CognitiveIntervention,
    CognitiveChallenge,
    KnowledgeOnly,
    ExampleRequest,
    SocraticExploration,
    SocraticClarification,
    KnowledgeWithChallenge,
    MultiAgentComprehensive,
    SupportiveScaffolding,
    FoundationalBuilding,
    BalancedGuidance,
}

impl Route {
    /// The priority-ordered agent list for this route (spec §4.3 table).
    /// The gamification override (spec §4.3) replaces the *route* but not
    /// this mapping; the forced route still looks its agents up here.
    pub fn agent_order(self) -> &'static [AgentRole] {
        use AgentRole::*;
        match self {
            Route::ProgressiveOpening => &[Context, Cognitive, Socratic, Synthesizer],
            Route::TopicTransition => &[Context, Domain, Cognitive, Synthesizer],
            Route::CognitiveIntervention => &[Cognitive, Socratic, Synthesizer],
            Route::CognitiveChallenge => &[Cognitive, Context, Socratic, Synthesizer],
            Route::KnowledgeOnly => &[Domain, Context, Synthesizer],
            Route::ExampleRequest => &[Domain, Context, Synthesizer],
            Route::SocraticExploration => &[Socratic, Context, Domain, Synthesizer],
            Route::SocraticClarification => &[Socratic, Domain, Context, Synthesizer],
            Route::KnowledgeWithChallenge => &[Domain, Socratic, Context, Synthesizer],
            Route::MultiAgentComprehensive => &[Analysis, Domain, Socratic, Context, Synthesizer],
            Route::SupportiveScaffolding => &[Socratic, Domain, Synthesizer],
            Route::FoundationalBuilding => &[Domain, Socratic, Synthesizer],
            Route::BalancedGuidance => &[Context, Domain, Socratic, Synthesizer],
        }
    }

    pub fn rule_id(self) -> &'static str {
        match self {
            Route::ProgressiveOpening => "R1_progressive_opening",
            Route::TopicTransition => "R2_topic_transition",
            Route::CognitiveIntervention => "R3_cognitive_intervention",
            Route::CognitiveChallenge => "R4_cognitive_challenge",
            Route::KnowledgeOnly => "R5_knowledge_only",
            Route::ExampleRequest => "R6_example_request",
            Route::SocraticExploration => "R7_socratic_exploration",
            Route::SocraticClarification => "R8_socratic_clarification",
            Route::KnowledgeWithChallenge => "R9_knowledge_with_challenge",
            Route::MultiAgentComprehensive => "R10_multi_agent_comprehensive",
            Route::SupportiveScaffolding => "R11_supportive_scaffolding",
            Route::FoundationalBuilding => "R12_foundational_building",
            Route::BalancedGuidance => "R13_balanced_guidance",
        }
    }
}

/// Sub-mode tag applied by the gamification override (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubMode {
    None,
    Gamified,
}

/// The Router's output for one turn (spec §3). Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoutingDecision {
    pub route: Route,
    pub agents: Vec<AgentRole>,
    pub rule_id: String,
    pub rule_confidence: f32,
    pub reason: String,
    pub sub_mode: SubMode,
}

impl RoutingDecision {
    pub fn for_route(route: Route, confidence: f32, reason: impl Into<String>) -> Self {
        Self {
            route,
            agents: route.agent_order().to_vec(),
            rule_id: route.rule_id().to_string(),
            rule_confidence: confidence,
            reason: reason.into(),
            sub_mode: SubMode::None,
        }
    }

    pub fn with_gamified_override(mut self, reason: impl Into<String>) -> Self {
        self.route = Route::CognitiveChallenge;
        self.agents = Route::CognitiveChallenge.agent_order().to_vec();
        self.rule_id = "R4_cognitive_challenge_gamified".to_string();
        self.sub_mode = SubMode::Gamified;
        self.reason = reason.into();
        self
    }
}
