//! Analysis agent (spec §4.4): assesses skill/phase/milestone status and
//! surfaces any pending visual-artifact analysis into shared context.

use async_trait::async_trait;
use serde_json::json;
use tutor_core::{AgentResponse, AgentRole, Classification, ResponseType, Route, SessionState};
use tutor_types::error::TutorResult;

use super::traits::{AgentEnvironment, SharedContext, TutorAgent};

pub struct AnalysisAgent;

#[async_trait]
impl TutorAgent for AnalysisAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Analysis
    }

    async fn process(
        &self,
        state: &SessionState,
        _classification: &Classification,
        route: Route,
        shared_context: &mut SharedContext,
        _env: &AgentEnvironment,
    ) -> TutorResult<AgentResponse> {
        let pending: Vec<&str> = state
            .artifacts
            .values()
            .filter(|artifact| artifact.needs_agent_analysis())
            .map(|artifact| artifact.artifact_id.as_str())
            .collect();

        if let Some(artifact) = state.artifacts.values().find(|a| a.needs_agent_analysis()) {
            if let Some(analysis) = &artifact.analysis {
                shared_context.insert(
                    "visual_insights",
                    json!({
                        "artifact_id": artifact.artifact_id,
                        "strengths": analysis.strengths,
                        "weaknesses": analysis.weaknesses,
                        "identified_elements": analysis.identified_elements,
                        "confidence": analysis.confidence,
                    }),
                );
            }
        }

        let skill_summary = json!({
            "skill_level": state.learner_profile.skill_level,
            "confidence_level": state.learner_profile.confidence_level,
            "design_phase": state.design_phase,
            "phase_completion_ratio": state.phase_completion_ratio(),
        });
        shared_context.insert("analysis_summary", skill_summary.clone());

        // Only multi_agent_comprehensive surfaces the analysis agent's own
        // text to the learner; every other route uses it purely as context
        // for the Synthesizer (spec §4.4).
        let response_text = if route == Route::MultiAgentComprehensive {
            format!(
                "Reviewer note — skill progress: currently at {:?} skill level, {:.0}% through the {:?} phase.",
                state.learner_profile.skill_level,
                state.phase_completion_ratio() * 100.0,
                state.design_phase
            )
        } else {
            String::new()
        };

        let mut response = AgentResponse::new(AgentRole::Analysis, ResponseType::Analysis, response_text)
            .with_metadata("skill_summary", skill_summary);
        if !pending.is_empty() {
            response = response.with_metadata("artifacts_marked_analyzed", json!(pending));
        }
        Ok(response)
    }
}
