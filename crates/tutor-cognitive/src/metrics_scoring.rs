//! Enhancement Metrics scoring (spec §4.6): deterministic, computable
//! without a second LLM call. Combines per-agent raw signals already in
//! `AgentResponse.enhancement_metrics` with classification/route/text-pattern
//! heuristics over the learner's message.

use std::sync::OnceLock;

use regex::Regex;
use tutor_core::{AgentResponse, Classification, EnhancementMetrics, Message, Route, UserIntent};
use tutor_types::config::MetricWeights;

fn self_questioning_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)\bi wonder\b").unwrap(),
            Regex::new(r"(?i)\bmaybe i should\b").unwrap(),
            Regex::new(r"(?i)\bam i (right|missing)\b").unwrap(),
            Regex::new(r"(?i)\bwhat if i\b").unwrap(),
        ]
    })
}

fn direct_answer_phrase() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)just tell me").unwrap())
}

fn max_metric(responses: &[AgentResponse], key: &str) -> Option<f32> {
    responses.iter().filter_map(|r| r.enhancement_metrics.get(key).copied()).fold(None, |acc, v| {
        Some(acc.map_or(v, |current: f32| current.max(v)))
    })
}

/// Evidence-volume heuristic for `scientific_confidence` (spec §4.6): more
/// agents contributing and a non-default classification confidence raise it.
fn scientific_confidence(responses: &[AgentResponse], classification: &Classification) -> f32 {
    let contributing = responses.iter().filter(|r| !r.is_unavailable()).count() as f32;
    let agent_factor = (contributing / 4.0).min(1.0);
    (agent_factor * 0.6 + classification.classification_confidence * 0.4).clamp(0.0, 1.0)
}

pub fn score_turn(
    responses: &[AgentResponse],
    classification: &Classification,
    route: Route,
    learner_message: &Message,
    weights: &MetricWeights,
) -> EnhancementMetrics {
    let refused_direct_answer = direct_answer_phrase().is_match(&learner_message.text)
        && matches!(route, Route::CognitiveIntervention | Route::CognitiveChallenge);

    let cognitive_offloading_prevention = max_metric(responses, "cognitive_offloading_prevention_score")
        .unwrap_or(if refused_direct_answer { 0.8 } else if classification.cognitive_offloading_detected { 0.2 } else { 0.5 });

    let deep_thinking_engagement = match classification.engagement_level {
        tutor_core::EngagementLevel::High => 0.85,
        tutor_core::EngagementLevel::Medium => 0.55,
        tutor_core::EngagementLevel::Low => 0.25,
    };

    let knowledge_integration = if matches!(route, Route::KnowledgeOnly | Route::ExampleRequest | Route::KnowledgeWithChallenge) {
        0.75
    } else {
        0.4
    };

    let scaffolding_effectiveness = match route {
        Route::SupportiveScaffolding | Route::FoundationalBuilding | Route::SocraticClarification => 0.8,
        Route::SocraticExploration | Route::BalancedGuidance => 0.6,
        _ => 0.4,
    };

    let learning_progression = if classification.is_topic_transition { 0.7 } else { 0.5 };

    let self_questioning = self_questioning_patterns().iter().any(|re| re.is_match(&learner_message.text));
    let metacognitive_awareness = max_metric(responses, "metacognitive_awareness_score")
        .unwrap_or(if self_questioning { 0.75 } else if classification.user_intent == UserIntent::EvaluationRequest { 0.6 } else { 0.35 });

    EnhancementMetrics::from_components(
        cognitive_offloading_prevention,
        deep_thinking_engagement,
        knowledge_integration,
        scaffolding_effectiveness,
        learning_progression,
        metacognitive_awareness,
        scientific_confidence(responses, classification),
        weights,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tutor_core::{ConfidenceLevel, EngagementLevel, InputType, UnderstandingLevel};

    fn classification(intent: UserIntent) -> Classification {
        Classification {
            user_intent: intent,
            input_type: InputType::Text,
            understanding_level: UnderstandingLevel::Medium,
            engagement_level: EngagementLevel::Low,
            confidence_level: ConfidenceLevel::Medium,
            cognitive_offloading_detected: intent == UserIntent::DirectAnswerRequest,
            is_first_message: false,
            is_topic_transition: false,
            is_pure_knowledge_request: false,
            dominant_design_dimensions: BTreeSet::new(),
            classification_confidence: 0.9,
        }
    }

    #[test]
    fn refusing_direct_answer_raises_offloading_prevention() {
        let message = Message::learner("Just tell me the exact layout.", 0);
        let metrics = score_turn(
            &[],
            &classification(UserIntent::DirectAnswerRequest),
            Route::CognitiveIntervention,
            &message,
            &MetricWeights::default(),
        );
        assert!(metrics.cognitive_offloading_prevention_score >= 0.8);
    }

    #[test]
    fn pure_knowledge_route_raises_knowledge_integration() {
        let message = Message::learner("What is biophilic design?", 0);
        let metrics = score_turn(
            &[],
            &classification(UserIntent::KnowledgeRequest),
            Route::KnowledgeOnly,
            &message,
            &MetricWeights::default(),
        );
        assert!(metrics.knowledge_integration_score >= 0.7);
    }
}
