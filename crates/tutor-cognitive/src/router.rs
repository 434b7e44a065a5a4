//! Router (C5, spec §4.3): a priority-ordered decision tree over
//! Classification + SessionState, plus the gamification override pass.

use std::sync::OnceLock;

use regex::Regex;
use tutor_core::{
    Classification, ConfidenceLevel, EngagementLevel, Route, RoutingDecision, SessionState,
    UnderstandingLevel, UserIntent,
};
use tutor_types::config::{GamificationConfig, RouterConfig};

struct RoutingRule {
    rule_id: &'static str,
    route: Route,
    predicate: fn(&Classification, &SessionState) -> bool,
    reason: &'static str,
}

/// Priority-ordered rule table (spec §4.3). First predicate that holds wins;
/// `RouterConfig.rule_overrides` disables a rule by id before evaluation.
const RULES: &[RoutingRule] = &[
    RoutingRule {
        rule_id: "R1_progressive_opening",
        route: Route::ProgressiveOpening,
        predicate: |c, _| c.is_first_message,
        reason: "first learner message in the session",
    },
    RoutingRule {
        rule_id: "R2_topic_transition",
        route: Route::TopicTransition,
        predicate: |c, _| c.is_topic_transition,
        reason: "dominant design dimensions shifted from the prior turn",
    },
    RoutingRule {
        rule_id: "R3_cognitive_intervention",
        route: Route::CognitiveIntervention,
        predicate: |c, _| c.cognitive_offloading_detected,
        reason: "learner is asking for a direct answer instead of working through the problem",
    },
    RoutingRule {
        rule_id: "R4_cognitive_challenge",
        route: Route::CognitiveChallenge,
        predicate: |c, _| {
            c.engagement_level == EngagementLevel::Low || c.confidence_level == ConfidenceLevel::Overconfident
        },
        reason: "low engagement or overconfidence calls for a challenge prompt",
    },
    RoutingRule {
        rule_id: "R5_knowledge_only",
        route: Route::KnowledgeOnly,
        predicate: |c, _| c.user_intent == UserIntent::KnowledgeRequest && c.is_pure_knowledge_request,
        reason: "learner asked a plain factual question with no design context attached",
    },
    RoutingRule {
        rule_id: "R6_example_request",
        route: Route::ExampleRequest,
        predicate: |c, _| c.user_intent == UserIntent::ExampleRequest,
        reason: "learner asked for precedents or examples",
    },
    RoutingRule {
        rule_id: "R7_socratic_exploration",
        route: Route::SocraticExploration,
        predicate: |c, _| c.user_intent == UserIntent::DesignExploration && c.engagement_level == EngagementLevel::High,
        reason: "learner is actively exploring the design and ready for deeper questions",
    },
    RoutingRule {
        rule_id: "R8_socratic_clarification",
        route: Route::SocraticClarification,
        predicate: |c, _| c.user_intent == UserIntent::ConfusionExpression,
        reason: "learner expressed confusion",
    },
    RoutingRule {
        rule_id: "R9_knowledge_with_challenge",
        route: Route::KnowledgeWithChallenge,
        predicate: |c, _| {
            c.user_intent == UserIntent::TechnicalQuestion && c.understanding_level >= UnderstandingLevel::Medium
        },
        reason: "technical question from a learner who already has some grounding",
    },
    RoutingRule {
        rule_id: "R10_multi_agent_comprehensive",
        route: Route::MultiAgentComprehensive,
        predicate: |c, _| c.user_intent == UserIntent::EvaluationRequest || c.user_intent == UserIntent::FeedbackRequest,
        reason: "learner asked for an overall evaluation or feedback",
    },
    RoutingRule {
        rule_id: "R11_supportive_scaffolding",
        route: Route::SupportiveScaffolding,
        predicate: |c, _| {
            c.user_intent == UserIntent::ConfusionExpression && c.understanding_level == UnderstandingLevel::Low
        },
        reason: "learner is confused and starting from a low understanding level",
    },
    RoutingRule {
        rule_id: "R12_foundational_building",
        route: Route::FoundationalBuilding,
        predicate: |c, _| {
            c.user_intent == UserIntent::ImplementationRequest && c.understanding_level == UnderstandingLevel::Low
        },
        reason: "learner wants to build before the fundamentals are in place",
    },
    RoutingRule {
        rule_id: "R13_balanced_guidance",
        route: Route::BalancedGuidance,
        predicate: |_, _| true,
        reason: "no more specific rule applied",
    },
];

fn gamification_trigger_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)how would a user feel").unwrap(),
            Regex::new(r"(?i)i wonder if").unwrap(),
            Regex::new(r"(?i)what if (someone|a (visitor|resident|user))").unwrap(),
        ]
    })
}

fn gamification_eligible(text: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|re| re.is_match(text))
}

pub struct Router {
    rule_overrides: Vec<String>,
    gamification: GamificationConfig,
}

impl Router {
    pub fn new(router_config: &RouterConfig, gamification: GamificationConfig) -> Self {
        Self { rule_overrides: router_config.rule_overrides.clone(), gamification }
    }

    /// Evaluate the decision tree, then apply the gamification override.
    pub fn route(&self, classification: &Classification, state: &SessionState, message_text: &str) -> RoutingDecision {
        let rule = RULES
            .iter()
            .find(|rule| !self.rule_overrides.iter().any(|id| id == rule.rule_id) && (rule.predicate)(classification, state))
            .unwrap_or_else(|| RULES.last().expect("balanced_guidance default rule always present"));

        let confidence = if rule.route == Route::BalancedGuidance { 0.5 } else { classification.classification_confidence };
        let decision = RoutingDecision::for_route(rule.route, confidence, rule.reason);

        if self.gamification_applies(message_text, state) {
            decision.with_gamified_override("trigger phrase detected and the gamified-challenge frequency cap allows it")
        } else {
            decision
        }
    }

    fn gamification_applies(&self, message_text: &str, state: &SessionState) -> bool {
        if !gamification_eligible(message_text, gamification_trigger_patterns()) {
            return false;
        }
        // The actual count lives in agent_context, set by the Orchestrator
        // after each gamified turn (see orchestrator::update_gamification_window).
        let issued_in_window = state
            .agent_context
            .get("gamified_challenges_in_window")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;
        issued_in_window < self.gamification.max_per_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::{Classification, InputType};
    use std::collections::BTreeSet;

    fn base_classification() -> Classification {
        Classification {
            user_intent: UserIntent::GeneralStatement,
            input_type: InputType::Text,
            understanding_level: UnderstandingLevel::Medium,
            engagement_level: EngagementLevel::Medium,
            confidence_level: ConfidenceLevel::Medium,
            cognitive_offloading_detected: false,
            is_first_message: false,
            is_topic_transition: false,
            is_pure_knowledge_request: false,
            dominant_design_dimensions: BTreeSet::new(),
            classification_confidence: 0.9,
        }
    }

    fn router() -> Router {
        Router::new(&RouterConfig::default(), GamificationConfig::default())
    }

    #[test]
    fn first_message_always_routes_to_progressive_opening() {
        let mut classification = base_classification();
        classification.is_first_message = true;
        classification.user_intent = UserIntent::DirectAnswerRequest;
        classification.cognitive_offloading_detected = true;
        let state = SessionState::new("residential", "brief");
        let decision = router().route(&classification, &state, "do it for me");
        assert_eq!(decision.route, Route::ProgressiveOpening);
    }

    #[test]
    fn direct_answer_request_routes_to_cognitive_intervention() {
        let mut classification = base_classification();
        classification.cognitive_offloading_detected = true;
        let state = SessionState::new("residential", "brief");
        let decision = router().route(&classification, &state, "just tell me the answer");
        assert_eq!(decision.route, Route::CognitiveIntervention);
    }

    #[test]
    fn pure_knowledge_request_routes_to_knowledge_only() {
        let mut classification = base_classification();
        classification.user_intent = UserIntent::KnowledgeRequest;
        classification.is_pure_knowledge_request = true;
        let state = SessionState::new("residential", "brief");
        let decision = router().route(&classification, &state, "what is biophilic design?");
        assert_eq!(decision.route, Route::KnowledgeOnly);
    }

    #[test]
    fn default_falls_through_to_balanced_guidance() {
        let classification = base_classification();
        let state = SessionState::new("residential", "brief");
        let decision = router().route(&classification, &state, "I like the layout so far.");
        assert_eq!(decision.route, Route::BalancedGuidance);
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let mut classification = base_classification();
        classification.user_intent = UserIntent::KnowledgeRequest;
        classification.is_pure_knowledge_request = true;
        let state = SessionState::new("residential", "brief");
        let router_config = RouterConfig { rule_overrides: vec!["R5_knowledge_only".to_string()] };
        let decision = Router::new(&router_config, GamificationConfig::default()).route(
            &classification,
            &state,
            "what is biophilic design?",
        );
        assert_ne!(decision.route, Route::KnowledgeOnly);
    }

    #[test]
    fn gamification_trigger_forces_cognitive_challenge_within_cap() {
        let classification = base_classification();
        let state = SessionState::new("residential", "brief");
        let decision = router().route(&classification, &state, "I wonder if a resident would feel safe here.");
        assert_eq!(decision.route, Route::CognitiveChallenge);
        assert_eq!(decision.sub_mode, tutor_core::SubMode::Gamified);
    }
}
