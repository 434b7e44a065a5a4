//! Socratic agent (spec §4.4): asks calibrated questions instead of handing
//! over solutions.

use async_trait::async_trait;
use tutor_core::{
    AgentResponse, AgentRole, ChatMessage, Classification, CompletionOptions, ResponseType, Route, SessionState,
    UnderstandingLevel,
};
use tutor_types::error::TutorResult;

use super::traits::{AgentEnvironment, SharedContext, TutorAgent};

pub struct SocraticAgent;

#[async_trait]
impl TutorAgent for SocraticAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Socratic
    }

    async fn process(
        &self,
        state: &SessionState,
        classification: &Classification,
        route: Route,
        _shared_context: &mut SharedContext,
        env: &AgentEnvironment,
    ) -> TutorResult<AgentResponse> {
        let detailed_brief = state
            .messages
            .last()
            .map(|m| m.is_detailed_brief())
            .unwrap_or(false);

        let question_count = if detailed_brief { 1 } else { 2 };
        let calibration = match classification.understanding_level {
            UnderstandingLevel::Low => "simple, concrete, one idea at a time",
            UnderstandingLevel::Medium => "moderately open-ended, inviting trade-off thinking",
            UnderstandingLevel::High => "abstract and comparative, pushing toward synthesis",
        };
        let solution_guard = matches!(route, Route::CognitiveIntervention | Route::CognitiveChallenge);

        let prompt = format!(
            "You are the Socratic agent in an architecture tutoring session. Design brief: {:?}. \
             Understanding level: {calibration}. {} \
             {} Ask exactly {question_count} question(s); never state a direct design solution.",
            state.design_brief,
            if detailed_brief {
                "The learner just gave a detailed brief; open with one sentence acknowledging a specific \
                 detail from it before your question."
            } else {
                ""
            },
            if solution_guard {
                "Do not provide or imply any concrete design answer, even partially."
            } else {
                ""
            },
        );
        let options = CompletionOptions { max_output_tokens: 200, temperature: 0.6, ..CompletionOptions::default() };
        let messages = vec![ChatMessage::system("Respond with plain prose."), ChatMessage::user(prompt)];

        let response_text = match env.llm.complete(&messages, &options).await {
            Ok(text) => text.trim().to_string(),
            Err(error) if error.retryable() => {
                return Ok(AgentResponse::unavailable(AgentRole::Socratic, ResponseType::Socratic));
            }
            Err(error) => return Err(error),
        };

        Ok(AgentResponse::new(AgentRole::Socratic, ResponseType::Socratic, response_text))
    }
}
