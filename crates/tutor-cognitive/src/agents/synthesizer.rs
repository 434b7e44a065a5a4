//! Synthesizer (spec §4.4): assembles the upstream AgentResponses into one
//! learner-facing reply under route-specific style rules.

use async_trait::async_trait;
use tutor_core::{
    AgentResponse, AgentRole, ChatMessage, Classification, CompletionOptions, ResponseType, Route, SessionState,
};
use tutor_types::error::TutorResult;

use crate::word_budget::{comprehensive_word_budget, progressive_opening_word_budget, word_budget};

use super::traits::{AgentEnvironment, SharedContext, TutorAgent};

pub struct SynthesizerAgent;

fn style_instructions(route: Route) -> &'static str {
    match route {
        Route::KnowledgeOnly | Route::ExampleRequest => {
            "Give a direct answer. Do not end with a question."
        }
        Route::SocraticExploration | Route::SocraticClarification | Route::SupportiveScaffolding => {
            "Write one short preamble sentence, then the question(s) from the Socratic contribution verbatim in spirit."
        }
        Route::BalancedGuidance | Route::FoundationalBuilding => {
            "Structure the reply as three short parts labeled Insight, Direction, and Watch."
        }
        Route::MultiAgentComprehensive => {
            "Present a menu of reviewer perspectives (community, practical, critical, client), each as a \
             clearly labeled short section, and close by asking the learner which perspective to dig into."
        }
        Route::CognitiveIntervention | Route::CognitiveChallenge => {
            "Open with a reframing statement, then a scaffolded exploration prompt. Refuse to give a finished design."
        }
        Route::TopicTransition => "Acknowledge the shift in topic in one sentence, then continue with the new thread.",
        Route::KnowledgeWithChallenge => {
            "Answer the technical question directly, then add one question that pushes the learner to apply it."
        }
        Route::ProgressiveOpening => {
            "Warmly acknowledge the project brief, then ask one or two opening questions about the site or users."
        }
    }
}

fn response_type_for_route(route: Route) -> ResponseType {
    match route {
        Route::KnowledgeOnly | Route::ExampleRequest => ResponseType::Knowledge,
        Route::SocraticExploration
        | Route::SocraticClarification
        | Route::SupportiveScaffolding
        | Route::ProgressiveOpening => ResponseType::Socratic,
        Route::CognitiveIntervention | Route::CognitiveChallenge => ResponseType::Challenge,
        Route::MultiAgentComprehensive => ResponseType::Synthesis,
        Route::BalancedGuidance
        | Route::FoundationalBuilding
        | Route::TopicTransition
        | Route::KnowledgeWithChallenge => ResponseType::Synthesis,
    }
}

#[async_trait]
impl TutorAgent for SynthesizerAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Synthesizer
    }

    async fn process(
        &self,
        state: &SessionState,
        _classification: &Classification,
        route: Route,
        shared_context: &mut SharedContext,
        env: &AgentEnvironment,
    ) -> TutorResult<AgentResponse> {
        let upstream: Vec<String> = shared_context
            .visual_insights()
            .map(|v| format!("visual insights: {v}"))
            .into_iter()
            .collect();

        let contributions = shared_context
            .get("upstream_contributions")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let response_type = response_type_for_route(route);
        let (min_words, max_words) = if route == Route::MultiAgentComprehensive {
            comprehensive_word_budget()
        } else if route == Route::ProgressiveOpening {
            progressive_opening_word_budget()
        } else {
            word_budget(response_type)
        };

        let prompt = format!(
            "You are the Synthesizer for an architecture tutoring session. Design brief: {:?}. \
             Upstream agent contributions to weave together:\n{contributions}\n{}\n\
             Style: {}\nWrite between {min_words} and {max_words} words.",
            state.design_brief,
            upstream.join("\n"),
            style_instructions(route),
        );
        let options = CompletionOptions {
            max_output_tokens: (max_words as u32 * 2).max(200),
            temperature: 0.6,
            ..CompletionOptions::default()
        };
        let messages = vec![ChatMessage::system("Respond with plain prose, no markdown headers unless asked."), ChatMessage::user(prompt)];

        let response_text = env.llm.complete(&messages, &options).await?.trim().to_string();

        Ok(AgentResponse::new(AgentRole::Synthesizer, response_type, response_text))
    }
}
