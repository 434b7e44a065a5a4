//! Pipeline Orchestrator (C9, spec §4.7): sequences a single turn through
//! classify → route → agents → synthesize → track → build → commit as one
//! atomic transaction. No DAG/scheduler — spec §5 mandates strictly
//! sequential agent execution within a turn.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use tutor_core::{
    AgentResponse, LlmGateway, Message, ResponseType, Route, SessionState, SubMode, TimingsMs, TurnRecord, TurnStatus,
};
use tutor_types::config::TutorConfig;
use tutor_types::error::{TutorError, TutorResult};

use crate::agents::{AgentEnvironment, SharedContext, TutorAgent};
use crate::classifier::Classifier;
use crate::metrics_scoring::score_turn;
use crate::response_builder::{build_failed_record, build_ok_record, enforce_word_budget};
use crate::router::Router;
use crate::tracker::apply_turn_progress;

pub struct Orchestrator {
    classifier: Classifier,
    router: Router,
    roster: HashMap<tutor_core::AgentRole, Arc<dyn TutorAgent>>,
    env: AgentEnvironment,
    config: TutorConfig,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmGateway>,
        knowledge: Arc<dyn tutor_core::KnowledgeStore>,
        config: TutorConfig,
    ) -> Self {
        let classifier = Classifier::new(llm.clone(), config.tracker.topic_transition_threshold_tau);
        let router = Router::new(&config.router, config.gamification.clone());
        let env = AgentEnvironment { llm, knowledge, config: config.clone() };
        Self { classifier, router, roster: crate::agents::build_roster(), env, config }
    }

    /// Run one learner turn to completion. Never panics on a provider
    /// failure; every hard failure path still returns a `TurnRecord` (spec
    /// §4.7: error handling is a single atomic transaction).
    pub async fn run_turn(
        &self,
        state: &mut SessionState,
        learner_text: String,
        attachment: Option<String>,
        cancellation: CancellationToken,
    ) -> TurnRecord {
        let started = Instant::now();
        let message_turn_index = state.next_turn_index();
        // The TurnRecord index is a contiguous per-turn counter (one per
        // committed turn), distinct from `message_turn_index` which counts
        // messages and so jumps by two per turn (learner + tutor).
        let record_index = state.interaction_counter;

        if learner_text.trim().is_empty() {
            let message = Message::learner(learner_text, message_turn_index);
            return build_failed_record(
                state.session_id.clone(),
                record_index,
                message,
                TurnStatus::Error,
                &TutorError::InputInvalid("learner message must not be empty".to_string()),
                TimingsMs::default(),
            );
        }

        let mut user_message = Message::learner(learner_text, message_turn_index);
        if let Some(artifact_id) = attachment {
            user_message = user_message.with_artifact(artifact_id);
        }

        let mut working_state = state.clone();
        if let Err(error) = working_state.append_message(user_message.clone()) {
            return build_failed_record(
                state.session_id.clone(),
                record_index,
                user_message,
                TurnStatus::Error,
                &TutorError::ValidationFailed(error),
                TimingsMs::default(),
            );
        }

        let turn_timeout = Duration::from_secs(self.config.limits.turn_timeout_s);
        match timeout(
            turn_timeout,
            self.run_turn_inner(&mut working_state, &user_message, message_turn_index, record_index, &cancellation),
        )
        .await
        {
            Ok(Ok(record)) => {
                *state = working_state;
                record
            }
            Ok(Err(error)) => {
                let status = if matches!(error, TutorError::Cancelled) { TurnStatus::Cancelled } else { TurnStatus::Error };
                build_failed_record(state.session_id.clone(), record_index, user_message, status, &error, elapsed_timings(started))
            }
            Err(_) => build_failed_record(
                state.session_id.clone(),
                record_index,
                user_message,
                TurnStatus::Error,
                &TutorError::Internal("turn exceeded its overall timeout".to_string()),
                elapsed_timings(started),
            ),
        }
    }

    async fn run_turn_inner(
        &self,
        state: &mut SessionState,
        user_message: &Message,
        message_turn_index: u64,
        record_index: u64,
        cancellation: &CancellationToken,
    ) -> TutorResult<TurnRecord> {
        let mut timings = TimingsMs::default();
        let total_started = Instant::now();

        if cancellation.is_cancelled() {
            return Err(TutorError::Cancelled);
        }

        let classify_started = Instant::now();
        let classification = timeout(
            Duration::from_secs(self.config.limits.classification_timeout_s),
            self.classifier.classify(user_message, state),
        )
        .await
        .map_err(|_| TutorError::ProviderTimeout("classification".to_string()))??;
        timings.classify = classify_started.elapsed().as_millis() as u64;

        let route_started = Instant::now();
        let routing_decision = self.router.route(&classification, state, &user_message.text);
        timings.route = route_started.elapsed().as_millis() as u64;

        let mut shared_context = SharedContext::new();
        let mut agent_responses: Vec<AgentResponse> = Vec::new();
        let mut upstream_text = String::new();

        for role in &routing_decision.agents {
            if cancellation.is_cancelled() {
                return Err(TutorError::Cancelled);
            }
            let agent = self
                .roster
                .get(role)
                .ok_or_else(|| TutorError::Internal(format!("no agent registered for role {role:?}")))?;

            let per_stage_timeout = if *role == tutor_core::AgentRole::Synthesizer {
                Duration::from_secs(self.config.limits.synthesizer_timeout_s)
            } else {
                Duration::from_secs(self.config.limits.agent_timeout_s)
            };

            let agent_started = Instant::now();
            let outcome = timeout(
                per_stage_timeout,
                agent.process(state, &classification, routing_decision.route, &mut shared_context, &self.env),
            )
            .await;
            timings.agents.insert(role.as_str().to_string(), agent_started.elapsed().as_millis() as u64);

            let response = match (*role, outcome) {
                (tutor_core::AgentRole::Synthesizer, Ok(Ok(response))) => response,
                (tutor_core::AgentRole::Synthesizer, Ok(Err(error))) => return Err(error),
                (tutor_core::AgentRole::Synthesizer, Err(_)) => {
                    return Err(TutorError::ProviderTimeout("synthesizer".to_string()));
                }
                (_, Ok(Ok(response))) => response,
                (_, Ok(Err(error))) if error.retryable() => {
                    AgentResponse::unavailable(*role, ResponseType::Analysis)
                }
                (_, Ok(Err(error))) => return Err(error),
                (_, Err(_)) => AgentResponse::unavailable(*role, ResponseType::Analysis),
            };

            if response.has_visible_text() && *role != tutor_core::AgentRole::Synthesizer {
                upstream_text.push_str(&format!("[{}] {}\n", role.as_str(), response.response_text));
                shared_context.insert("upstream_contributions", json!(upstream_text));
            }
            agent_responses.push(response);
        }

        if let Some(analysis_response) = agent_responses.iter().find(|r| r.agent == tutor_core::AgentRole::Analysis) {
            if let Some(ids) = analysis_response.metadata.get("artifacts_marked_analyzed").and_then(|v| v.as_array()) {
                for id in ids.iter().filter_map(|v| v.as_str()) {
                    state.mark_artifact_analyzed(id);
                }
            }
        }

        let synthesizer_response = agent_responses
            .iter()
            .find(|r| r.agent == tutor_core::AgentRole::Synthesizer)
            .ok_or_else(|| TutorError::Internal("route produced no synthesizer response".to_string()))?;

        let tutor_response_type = synthesizer_response.response_type;
        let final_text = enforce_word_budget(&synthesizer_response.response_text, tutor_response_type, routing_decision.route)?;

        if routing_decision.route == Route::CognitiveIntervention
            && crate::response_builder::contains_direct_solution_signature(&final_text)
        {
            return Err(TutorError::ValidationFailed(
                "cognitive_intervention reply contains a direct solution signature".to_string(),
            ));
        }
        if matches!(routing_decision.route, Route::KnowledgeOnly | Route::ExampleRequest)
            && crate::response_builder::looks_socratic(&final_text)
        {
            return Err(TutorError::ValidationFailed(
                "knowledge-style route produced a Socratic-shaped reply".to_string(),
            ));
        }

        self.update_gamification_window(state, routing_decision.sub_mode, record_index);

        let progress = apply_turn_progress(state, &agent_responses, &classification, user_message, &self.config.tracker);

        let metrics = score_turn(&agent_responses, &classification, routing_decision.route, user_message, &self.config.metrics.weights);

        let tutor_message = Message::tutor(final_text, message_turn_index + 1);
        state
            .append_message(tutor_message.clone())
            .map_err(TutorError::ValidationFailed)?;
        state.record_interaction();

        timings.synthesize = timings.agents.get("synthesizer").copied().unwrap_or(0);
        timings.total = total_started.elapsed().as_millis() as u64;

        build_ok_record(
            state,
            record_index,
            user_message.clone(),
            tutor_message,
            tutor_response_type,
            classification,
            &routing_decision,
            &agent_responses,
            metrics,
            &progress,
            timings,
        )
    }

    /// Maintain the gamified-challenge frequency cap the Router reads back
    /// (spec §4.3). The window resets every `window_turns` turns rather than
    /// sliding, trading precision for a single scalar in `agent_context`.
    fn update_gamification_window(&self, state: &mut SessionState, sub_mode: SubMode, record_index: u64) {
        let window = self.config.gamification.window_turns.max(1) as u64;
        let current = state
            .agent_context
            .get("gamified_challenges_in_window")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let reset = record_index % window == 0;
        let next = if reset { 0 } else { current } + if sub_mode == SubMode::Gamified { 1 } else { 0 };
        let _ = state.set_agent_context("gamified_challenges_in_window", json!(next));
    }
}

fn elapsed_timings(started: Instant) -> TimingsMs {
    TimingsMs { total: started.elapsed().as_millis() as u64, ..TimingsMs::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedKnowledgeStore, ScriptedLlmGateway};
    use tutor_types::config::TutorConfig;

    fn orchestrator(responses: Vec<&str>) -> Orchestrator {
        let llm = Arc::new(ScriptedLlmGateway::new(responses.into_iter().map(|s| s.to_string()).collect()));
        let knowledge = Arc::new(FixedKnowledgeStore::empty());
        Orchestrator::new(llm, knowledge, TutorConfig::default())
    }

    #[tokio::test]
    async fn empty_message_is_input_invalid_with_no_state_mutation() {
        let orchestrator = orchestrator(vec!["unused"]);
        let mut state = SessionState::new("community center", "brief");
        let before = state.messages.len();
        let cancellation = CancellationToken::new();
        let record = orchestrator.run_turn(&mut state, "   ".to_string(), None, cancellation).await;
        assert_eq!(record.status, TurnStatus::Error);
        assert_eq!(record.error.unwrap().kind, "input_invalid");
        assert_eq!(state.messages.len(), before);
    }

    #[tokio::test]
    async fn successive_turns_produce_contiguous_record_turn_indices() {
        let challenge_text = "reflect ".repeat(220);
        let socratic_text = "question ".repeat(120);
        let synthesis_text = format!("Pause on that request for a moment. {}", "reflect ".repeat(210));
        // Two full turns' worth of scripted agent replies; cognitive_offloading
        // stays pattern-matched (no classify-LLM call) so every run consumes
        // exactly three entries in order.
        let scripted: Vec<&str> =
            std::iter::repeat([challenge_text.as_str(), socratic_text.as_str(), synthesis_text.as_str()])
                .take(2)
                .flatten()
                .collect();
        let orchestrator = orchestrator(scripted);
        let mut state = SessionState::new("residential", "Design a small house for a family of four.");
        state.append_message(Message::learner("a prior turn", 0)).unwrap();
        state.append_message(Message::tutor("a prior reply", 1)).unwrap();
        for expected in 0..2u64 {
            let record = orchestrator
                .run_turn(&mut state, "Just tell me the exact layout.".to_string(), None, CancellationToken::new())
                .await;
            assert_eq!(record.status, TurnStatus::Ok);
            assert_eq!(record.turn_index, expected);
        }
        assert_eq!(state.interaction_counter, 2);
    }

    #[tokio::test]
    async fn cancelled_token_aborts_without_commit() {
        let orchestrator = orchestrator(vec!["unused"]);
        let mut state = SessionState::new("community center", "brief");
        let cancellation = CancellationToken::new();
        cancellation.cancel();
        let before = state.messages.len();
        let record = orchestrator.run_turn(&mut state, "hello there".to_string(), None, cancellation).await;
        assert_eq!(record.status, TurnStatus::Cancelled);
        assert_eq!(state.messages.len(), before);
    }
}
