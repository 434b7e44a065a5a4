//! Enhancement metrics (spec §4.6): six scalar pedagogical-quality scores
//! plus a derived overall score and a confidence-in-the-score estimate.

use serde::{Deserialize, Serialize};

use tutor_types::config::MetricWeights;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EnhancementMetrics {
    pub cognitive_offloading_prevention_score: f32,
    pub deep_thinking_engagement_score: f32,
    pub knowledge_integration_score: f32,
    pub scaffolding_effectiveness_score: f32,
    pub learning_progression_score: f32,
    pub metacognitive_awareness_score: f32,
    pub overall_cognitive_score: f32,
    pub scientific_confidence: f32,
}

impl EnhancementMetrics {
    /// Compute the weighted mean and attach it as `overall_cognitive_score`.
    /// `scientific_confidence` is supplied separately since it reflects
    /// evidence volume, not the scores themselves (spec §4.6).
    pub fn from_components(
        cognitive_offloading_prevention_score: f32,
        deep_thinking_engagement_score: f32,
        knowledge_integration_score: f32,
        scaffolding_effectiveness_score: f32,
        learning_progression_score: f32,
        metacognitive_awareness_score: f32,
        scientific_confidence: f32,
        weights: &MetricWeights,
    ) -> Self {
        let clamp = |v: f32| v.clamp(0.0, 1.0);
        let cop = clamp(cognitive_offloading_prevention_score);
        let dte = clamp(deep_thinking_engagement_score);
        let ki = clamp(knowledge_integration_score);
        let se = clamp(scaffolding_effectiveness_score);
        let lp = clamp(learning_progression_score);
        let ma = clamp(metacognitive_awareness_score);

        let weight_sum = weights.cognitive_offloading_prevention
            + weights.deep_thinking_engagement
            + weights.knowledge_integration
            + weights.scaffolding_effectiveness
            + weights.learning_progression
            + weights.metacognitive_awareness;
        let weight_sum = if weight_sum.abs() < f32::EPSILON { 1.0 } else { weight_sum };

        let overall = (cop * weights.cognitive_offloading_prevention
            + dte * weights.deep_thinking_engagement
            + ki * weights.knowledge_integration
            + se * weights.scaffolding_effectiveness
            + lp * weights.learning_progression
            + ma * weights.metacognitive_awareness)
            / weight_sum;

        Self {
            cognitive_offloading_prevention_score: cop,
            deep_thinking_engagement_score: dte,
            knowledge_integration_score: ki,
            scaffolding_effectiveness_score: se,
            learning_progression_score: lp,
            metacognitive_awareness_score: ma,
            overall_cognitive_score: clamp(overall),
            scientific_confidence: clamp(scientific_confidence),
        }
    }
}

impl Default for EnhancementMetrics {
    fn default() -> Self {
        Self {
            cognitive_offloading_prevention_score: 0.0,
            deep_thinking_engagement_score: 0.0,
            knowledge_integration_score: 0.0,
            scaffolding_effectiveness_score: 0.0,
            learning_progression_score: 0.0,
            metacognitive_awareness_score: 0.0,
            overall_cognitive_score: 0.0,
            scientific_confidence: 0.0,
        }
    }
}
