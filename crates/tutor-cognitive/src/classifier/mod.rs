//! Classifier (C4, spec §4.2): turns the latest learner message plus
//! session/profile context into a structured `Classification`.

mod patterns;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use tutor_core::{
    Classification, ConfidenceLevel, DesignDimension, EngagementLevel, InputType, LlmGateway,
    Message, SessionState, UnderstandingLevel, UserIntent,
};
use tutor_types::error::{TutorError, TutorResult};

use crate::llm_json::{complete_json, JsonCompletionSpec};

pub use patterns::{contains_guidance_words, detect_design_dimensions};

/// Topic transition threshold expressed as "at least this fraction of the
/// dominant dimension set must differ" (spec §4.2, configured via
/// `tracker.topic_transition_threshold_tau`).
fn is_topic_transition(previous: &[DesignDimension], current: &BTreeSet<DesignDimension>, tau: f32) -> bool {
    if previous.is_empty() || current.is_empty() {
        return false;
    }
    let previous_set: BTreeSet<DesignDimension> = previous.iter().copied().collect();
    let overlap = previous_set.intersection(current).count();
    let union = previous_set.union(current).count();
    if union == 0 {
        return false;
    }
    let difference_ratio = 1.0 - (overlap as f32 / union as f32);
    difference_ratio >= tau
}

#[derive(Debug, Deserialize)]
struct LlmIntentHint {
    intent: String,
}

#[derive(Debug, Deserialize)]
struct LlmClassification {
    user_intent: String,
    understanding_level: String,
    engagement_level: String,
    confidence_level: String,
    classification_confidence: f32,
}

fn parse_intent(raw: &str) -> Option<UserIntent> {
    match raw {
        "direct_answer_request" => Some(UserIntent::DirectAnswerRequest),
        "example_request" => Some(UserIntent::ExampleRequest),
        "knowledge_request" => Some(UserIntent::KnowledgeRequest),
        "feedback_request" => Some(UserIntent::FeedbackRequest),
        "confusion_expression" => Some(UserIntent::ConfusionExpression),
        "technical_question" => Some(UserIntent::TechnicalQuestion),
        "design_exploration" => Some(UserIntent::DesignExploration),
        "evaluation_request" => Some(UserIntent::EvaluationRequest),
        "implementation_request" => Some(UserIntent::ImplementationRequest),
        "general_statement" => Some(UserIntent::GeneralStatement),
        _ => None,
    }
}

fn parse_understanding(raw: &str) -> UnderstandingLevel {
    match raw {
        "high" => UnderstandingLevel::High,
        "low" => UnderstandingLevel::Low,
        _ => UnderstandingLevel::Medium,
    }
}

fn parse_engagement(raw: &str) -> EngagementLevel {
    match raw {
        "high" => EngagementLevel::High,
        "low" => EngagementLevel::Low,
        _ => EngagementLevel::Medium,
    }
}

fn parse_confidence(raw: &str) -> ConfidenceLevel {
    match raw {
        "overconfident" => ConfidenceLevel::Overconfident,
        "low" => ConfidenceLevel::Low,
        _ => ConfidenceLevel::Medium,
    }
}

/// Turns raw learner input into a `Classification` via the three-layer
/// strategy in spec §4.2.
pub struct Classifier {
    llm: Arc<dyn LlmGateway>,
    topic_transition_tau: f32,
}

impl Classifier {
    pub fn new(llm: Arc<dyn LlmGateway>, topic_transition_tau: f32) -> Self {
        Self { llm, topic_transition_tau }
    }

    pub async fn classify(&self, message: &Message, state: &SessionState) -> TutorResult<Classification> {
        let is_first_message = state.learner_message_count() == 0;
        let dims: BTreeSet<DesignDimension> = detect_design_dimensions(&message.text).into_iter().collect();
        let topic_transition =
            is_topic_transition(&state.previous_dominant_dimensions, &dims, self.topic_transition_tau);

        // Edge case: blank input never reaches the LLM. In practice
        // post_message rejects blank text with input_invalid before the
        // pipeline ever calls the classifier; this remains as defense in
        // depth for callers that bypass that guard (see DESIGN.md).
        if message.is_blank() {
            let mut classification = Classification::blank_fallback();
            classification.is_first_message = is_first_message;
            return Ok(classification);
        }

        let mut classification = if let Some(intent) = self.match_high_confidence(&message.text) {
            self.classification_from_pattern(intent, message, &dims)
        } else if let Some(hint) = self.match_context_dependent(&message.text) {
            let intent = self.disambiguate_with_llm(&message.text, hint).await?;
            self.classification_from_pattern(intent, message, &dims)
        } else {
            self.classify_with_llm(&message.text, &dims).await?
        };

        classification.is_first_message = is_first_message;
        classification.is_topic_transition = topic_transition;
        classification.dominant_design_dimensions = dims;
        classification.input_type = if message.attached_artifact.is_some() {
            InputType::TextWithSketch
        } else {
            InputType::Text
        };

        if message.is_detailed_brief() && classification.engagement_level < EngagementLevel::Medium {
            classification.engagement_level = EngagementLevel::Medium;
        }

        classification.cognitive_offloading_detected = classification.user_intent
            == UserIntent::DirectAnswerRequest
            || state.recent_direct_answer_count() >= 3;

        classification.is_pure_knowledge_request = classification.user_intent == UserIntent::KnowledgeRequest
            && !contains_guidance_words(&message.text);

        Ok(classification)
    }

    fn match_high_confidence(&self, text: &str) -> Option<UserIntent> {
        for (intent, regexes) in patterns::high_confidence_patterns() {
            if regexes.iter().any(|re| re.is_match(text)) {
                return Some(*intent);
            }
        }
        None
    }

    fn match_context_dependent(&self, text: &str) -> Option<&'static [UserIntent]> {
        for (regexes, hints) in patterns::context_dependent_patterns() {
            if regexes.iter().any(|re| re.is_match(text.trim())) {
                return Some(*hints);
            }
        }
        None
    }

    fn classification_from_pattern(
        &self,
        intent: UserIntent,
        message: &Message,
        _dims: &BTreeSet<DesignDimension>,
    ) -> Classification {
        let understanding_level = match intent {
            UserIntent::ConfusionExpression => UnderstandingLevel::Low,
            UserIntent::TechnicalQuestion => UnderstandingLevel::Medium,
            _ => UnderstandingLevel::Medium,
        };
        let engagement_level = match intent {
            UserIntent::DirectAnswerRequest => EngagementLevel::Low,
            _ if message.is_detailed_brief() => EngagementLevel::Medium,
            _ => EngagementLevel::Medium,
        };

        Classification {
            user_intent: intent,
            input_type: InputType::Text,
            understanding_level,
            engagement_level,
            confidence_level: ConfidenceLevel::Medium,
            cognitive_offloading_detected: false,
            is_first_message: false,
            is_topic_transition: false,
            is_pure_knowledge_request: false,
            dominant_design_dimensions: BTreeSet::new(),
            classification_confidence: 0.95,
        }
    }

    async fn disambiguate_with_llm(&self, text: &str, hints: &[UserIntent]) -> TutorResult<UserIntent> {
        let hint_names: Vec<&str> = hints.iter().map(|i| intent_name(*i)).collect();
        let prompt = format!(
            "Classify this architecture-tutoring learner message into exactly one of: {}. \
             Message: {:?}. Respond with strict JSON: {{\"intent\": \"<one of the options>\"}}.",
            hint_names.join(", "),
            text
        );
        let spec = JsonCompletionSpec { retries: 2, max_output_tokens: 64 };
        let parsed: LlmIntentHint = complete_json(&*self.llm, &prompt, &spec).await.unwrap_or(LlmIntentHint {
            intent: intent_name(hints[0]).to_string(),
        });
        Ok(parse_intent(&parsed.intent).unwrap_or(hints[0]))
    }

    async fn classify_with_llm(
        &self,
        text: &str,
        dims: &BTreeSet<DesignDimension>,
    ) -> TutorResult<Classification> {
        let prompt = format!(
            "You are classifying one learner turn in an architectural design tutoring session. \
             Message: {:?}. Respond with strict JSON matching this shape: {{\"user_intent\": \
             \"design_exploration|evaluation_request|implementation_request|general_statement\", \
             \"understanding_level\": \"low|medium|high\", \"engagement_level\": \"low|medium|high\", \
             \"confidence_level\": \"low|medium|overconfident\", \"classification_confidence\": 0.0}}.",
            text
        );
        let spec = JsonCompletionSpec { retries: 2, max_output_tokens: 128 };
        match complete_json::<LlmClassification>(&*self.llm, &prompt, &spec).await {
            Ok(parsed) => Ok(Classification {
                user_intent: parse_intent(&parsed.user_intent).unwrap_or(UserIntent::GeneralStatement),
                input_type: InputType::Text,
                understanding_level: parse_understanding(&parsed.understanding_level),
                engagement_level: parse_engagement(&parsed.engagement_level),
                confidence_level: parse_confidence(&parsed.confidence_level),
                cognitive_offloading_detected: false,
                is_first_message: false,
                is_topic_transition: false,
                is_pure_knowledge_request: false,
                dominant_design_dimensions: dims.clone(),
                classification_confidence: parsed.classification_confidence.clamp(0.0, 1.0),
            }),
            Err(TutorError::ProviderMalformed(_)) | Err(TutorError::ProviderTimeout(_)) => {
                // Spec §4.2: fall back to general_statement with low
                // confidence after exhausting retries, rather than hard
                // failing the turn.
                let mut fallback = Classification::blank_fallback();
                fallback.dominant_design_dimensions = dims.clone();
                fallback.classification_confidence = 0.2;
                Ok(fallback)
            }
            Err(other) => Err(other),
        }
    }
}

fn intent_name(intent: UserIntent) -> &'static str {
    match intent {
        UserIntent::DirectAnswerRequest => "direct_answer_request",
        UserIntent::ExampleRequest => "example_request",
        UserIntent::KnowledgeRequest => "knowledge_request",
        UserIntent::FeedbackRequest => "feedback_request",
        UserIntent::ConfusionExpression => "confusion_expression",
        UserIntent::TechnicalQuestion => "technical_question",
        UserIntent::DesignExploration => "design_exploration",
        UserIntent::EvaluationRequest => "evaluation_request",
        UserIntent::ImplementationRequest => "implementation_request",
        UserIntent::GeneralStatement => "general_statement",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::NullLlmGateway;
    use tutor_core::SessionState;

    fn classifier() -> Classifier {
        Classifier::new(Arc::new(NullLlmGateway), 0.5)
    }

    #[tokio::test]
    async fn direct_answer_request_is_pattern_matched() {
        let state = SessionState::new("residential", "brief");
        let message = Message::learner("Just tell me the exact layout.", 0);
        let classification = classifier().classify(&message, &state).await.unwrap();
        assert_eq!(classification.user_intent, UserIntent::DirectAnswerRequest);
        assert!(classification.cognitive_offloading_detected);
    }

    #[tokio::test]
    async fn knowledge_request_without_guidance_words_is_pure() {
        let state = SessionState::new("residential", "brief");
        let message = Message::learner("What is biophilic design?", 0);
        let classification = classifier().classify(&message, &state).await.unwrap();
        assert_eq!(classification.user_intent, UserIntent::KnowledgeRequest);
        assert!(classification.is_pure_knowledge_request);
    }

    #[tokio::test]
    async fn knowledge_request_with_guidance_words_is_not_pure() {
        let state = SessionState::new("residential", "brief");
        let message = Message::learner("What is biophilic design, should I use it on my site?", 0);
        let classification = classifier().classify(&message, &state).await.unwrap();
        assert!(!classification.is_pure_knowledge_request);
    }

    #[tokio::test]
    async fn blank_message_skips_llm_and_is_general_statement() {
        let state = SessionState::new("residential", "brief");
        let message = Message::learner("   ", 0);
        let classification = classifier().classify(&message, &state).await.unwrap();
        assert_eq!(classification.user_intent, UserIntent::GeneralStatement);
    }

    #[tokio::test]
    async fn detailed_brief_forces_medium_engagement() {
        let state = SessionState::new("residential", "brief");
        let long_text = "word ".repeat(120);
        let message = Message::learner(long_text, 0);
        let classification = classifier().classify(&message, &state).await.unwrap();
        assert!(classification.engagement_level >= EngagementLevel::Medium);
    }
}
