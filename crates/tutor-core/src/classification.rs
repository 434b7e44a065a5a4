//! `Classification` entity (spec §3, §4.2).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::profile::{ConfidenceLevel, EngagementLevel};

/// Closed set of recognized learner intents (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIntent {
    DirectAnswerRequest,
    ExampleRequest,
    KnowledgeRequest,
    FeedbackRequest,
    ConfusionExpression,
    TechnicalQuestion,
    DesignExploration,
    EvaluationRequest,
    ImplementationRequest,
    GeneralStatement,
}

/// Closed set of input channel types (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Text,
    TextWithSketch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderstandingLevel {
    Low,
    Medium,
    High,
}

/// One of the six design dimensions a turn may foreground (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignDimension {
    Functional,
    Spatial,
    Technical,
    Contextual,
    Aesthetic,
    Sustainable,
}

pub type DesignDimensionSet = BTreeSet<DesignDimension>;

/// Structured classification of one learner turn (spec §3, §4.2). Produced
/// by the Classifier, consumed by the Router and agents, never mutated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Classification {
    pub user_intent: UserIntent,
    pub input_type: InputType,
    pub understanding_level: UnderstandingLevel,
    pub engagement_level: EngagementLevel,
    pub confidence_level: ConfidenceLevel,
    pub cognitive_offloading_detected: bool,
    pub is_first_message: bool,
    pub is_topic_transition: bool,
    pub is_pure_knowledge_request: bool,
    pub dominant_design_dimensions: DesignDimensionSet,
    pub classification_confidence: f32,
}

impl Classification {
    /// Spec §4.2 edge case: blank input short-circuits to `general_statement`
    /// without an LLM call.
    pub fn blank_fallback() -> Self {
        Self {
            user_intent: UserIntent::GeneralStatement,
            input_type: InputType::Text,
            understanding_level: UnderstandingLevel::Medium,
            engagement_level: EngagementLevel::Medium,
            confidence_level: ConfidenceLevel::Medium,
            cognitive_offloading_detected: false,
            is_first_message: false,
            is_topic_transition: false,
            is_pure_knowledge_request: false,
            dominant_design_dimensions: DesignDimensionSet::new(),
            classification_confidence: 0.0,
        }
    }
}
