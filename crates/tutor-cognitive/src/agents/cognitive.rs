//! Cognitive agent (spec §4.4): challenges offloading and overconfidence,
//! and contributes the raw signal the metrics stage turns into scores.

use async_trait::async_trait;
use tutor_core::{
    AgentResponse, AgentRole, ChatMessage, Classification, CompletionOptions, ConfidenceLevel, DesignPhase,
    ResponseType, Route, SessionState,
};
use tutor_types::error::TutorResult;

use super::traits::{AgentEnvironment, SharedContext, TutorAgent};

pub struct CognitiveAgent;

fn phase_template(phase: DesignPhase) -> &'static str {
    match phase {
        DesignPhase::Ideation => "push the learner to articulate the underlying need before any form decision",
        DesignPhase::Visualization => "push the learner to justify a spatial or massing choice against the brief",
        DesignPhase::Materialization => "push the learner to reconcile a material/structural choice with their concept",
    }
}

#[async_trait]
impl TutorAgent for CognitiveAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Cognitive
    }

    async fn process(
        &self,
        state: &SessionState,
        classification: &Classification,
        _route: Route,
        _shared_context: &mut SharedContext,
        env: &AgentEnvironment,
    ) -> TutorResult<AgentResponse> {
        let offloading = classification.cognitive_offloading_detected;
        let overconfident = classification.confidence_level == ConfidenceLevel::Overconfident;
        let template = phase_template(state.design_phase);

        let prompt = format!(
            "You are the Cognitive agent in an architecture tutoring session. The learner {} direct answers \
             without working through the problem{}. Write one short challenge prompt (2-4 sentences) that \
             refuses to hand over a complete solution and instead asks them to reason it out themselves; {}. \
             Never include a finished design answer.",
            if offloading { "is asking for" } else { "is not currently asking for" },
            if overconfident { " and is expressing high confidence that may be premature" } else { "" },
            template,
        );
        let options = CompletionOptions { max_output_tokens: 220, temperature: 0.5, ..CompletionOptions::default() };
        let messages = vec![ChatMessage::system("Respond with plain prose."), ChatMessage::user(prompt)];

        let response_text = match env.llm.complete(&messages, &options).await {
            Ok(text) => text.trim().to_string(),
            Err(error) if error.retryable() => {
                return Ok(AgentResponse::unavailable(AgentRole::Cognitive, ResponseType::Challenge));
            }
            Err(error) => return Err(error),
        };

        // Raw signal for the metrics stage (spec §4.6): a successful refusal
        // of a direct-answer request raises cognitive_offloading_prevention;
        // asking the learner to justify themselves raises metacognitive
        // awareness. The final clamped/weighted scores are computed in
        // metrics_scoring, not here, to keep scoring a single deterministic
        // pass over the whole turn.
        let mut response = AgentResponse::new(AgentRole::Cognitive, ResponseType::Challenge, response_text);
        if offloading {
            response = response
                .with_flag(tutor_core::CognitiveFlag::OffloadingAttempt)
                .with_metric("cognitive_offloading_prevention_score", 0.85);
        }
        if overconfident {
            response = response.with_flag(tutor_core::CognitiveFlag::Overconfidence);
        }
        response = response.with_metric("metacognitive_awareness_score", 0.6);
        Ok(response)
    }
}
