//! Phase/Milestone Tracker (C7, spec §4.5): applies a turn's proposed
//! progress atomically against `SessionState`'s validated mutation API.

use std::sync::OnceLock;

use regex::Regex;
use tutor_core::{AgentResponse, Classification, Message, ProgressUpdate, SessionState, SkillLevel, UnderstandingLevel};
use tutor_types::config::TrackerConfig;

fn conversation_advance_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)\bbecause\b").unwrap(),
            Regex::new(r"(?i)\bwhat if\b").unwrap(),
            Regex::new(r"(?i)\bcompared to\b").unwrap(),
            Regex::new(r"(?i)\bthat reminds me\b").unwrap(),
        ]
    })
}

/// Whether this learner turn exhibits the "indicator patterns" spec §4.5
/// names for conversation-phase advancement: longer elaboration or
/// reasoning/comparison language.
fn shows_conversational_depth(message: &Message) -> bool {
    message.word_count() > 40 || conversation_advance_patterns().iter().any(|re| re.is_match(&message.text))
}

fn skill_level_for(understanding_level: UnderstandingLevel) -> SkillLevel {
    match understanding_level {
        UnderstandingLevel::Low => SkillLevel::Beginner,
        UnderstandingLevel::Medium => SkillLevel::Intermediate,
        UnderstandingLevel::High => SkillLevel::Advanced,
    }
}

/// Fold this turn's classification into the running `LearnerProfile` (spec
/// §3: "running counters of direct-answer requests and reflective
/// statements"; profile "mutated only via the State Store's validated
/// update"). Reuses `shows_conversational_depth`'s elaboration/reasoning
/// signal as the reflective-statement indicator.
fn update_learner_profile(state: &mut SessionState, classification: &Classification, learner_message: &Message) {
    if classification.cognitive_offloading_detected {
        state.learner_profile.record_direct_answer_request();
    }
    if shows_conversational_depth(learner_message) {
        state.learner_profile.record_reflective_statement();
    }
    state.learner_profile.skill_level = skill_level_for(classification.understanding_level);
    state.learner_profile.engagement_level = classification.engagement_level;
    state.learner_profile.confidence_level = classification.confidence_level;
}

/// Combine every agent's `ProgressUpdate` proposal into one (later agents'
/// milestone deltas overwrite earlier ones for the same id; readiness is
/// OR'd across agents since any agent may surface it).
fn merge_progress_updates(responses: &[AgentResponse]) -> ProgressUpdate {
    let mut merged = ProgressUpdate::default();
    for response in responses {
        for (milestone_id, delta) in &response.progress_update.milestone_deltas {
            merged.milestone_deltas.insert(milestone_id.clone(), *delta);
        }
        merged.phase_progress_delta += response.progress_update.phase_progress_delta;
        merged.readiness_signal |= response.progress_update.readiness_signal;
        merged.milestone_questions_asked += response.progress_update.milestone_questions_asked;
        merged.milestone_responses_graded += response.progress_update.milestone_responses_graded;
    }
    merged
}

/// Apply a turn's combined progress proposal to `state`, returning the
/// merged update for TurnRecord bookkeeping. All mutation goes through
/// `SessionState`'s own clamping/non-regression methods (spec §4.5).
pub fn apply_turn_progress(
    state: &mut SessionState,
    responses: &[AgentResponse],
    classification: &Classification,
    learner_message: &Message,
    config: &TrackerConfig,
) -> ProgressUpdate {
    let merged = merge_progress_updates(responses);

    for (milestone_id, delta) in &merged.milestone_deltas {
        let current = state.milestones.get(milestone_id).map(|m| m.progress).unwrap_or(0.0);
        state.apply_milestone_progress(milestone_id, current + delta);
    }

    let current_progress = state.phase_progress;
    state.set_phase_progress(current_progress + merged.phase_progress_delta);
    state.maybe_advance_phase(config.phase_completion_threshold, merged.readiness_signal);

    state.maybe_advance_conversation_phase(shows_conversational_depth(learner_message));
    state.record_direct_answer_flag(classification.cognitive_offloading_detected);
    state.push_dominant_dimensions(classification.dominant_design_dimensions.iter().copied().collect());
    update_learner_profile(state, classification, learner_message);

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::{AgentRole, Classification, InputType, ResponseType, UnderstandingLevel};
    use tutor_core::{ConfidenceLevel, EngagementLevel};

    fn classification() -> Classification {
        Classification {
            user_intent: tutor_core::UserIntent::GeneralStatement,
            input_type: InputType::Text,
            understanding_level: UnderstandingLevel::Medium,
            engagement_level: EngagementLevel::Medium,
            confidence_level: ConfidenceLevel::Medium,
            cognitive_offloading_detected: false,
            is_first_message: false,
            is_topic_transition: false,
            is_pure_knowledge_request: false,
            dominant_design_dimensions: Default::default(),
            classification_confidence: 0.9,
        }
    }

    #[test]
    fn milestone_deltas_accumulate_and_clamp() {
        let mut state = SessionState::new("residential", "brief");
        let id = tutor_core::DesignPhase::Ideation.default_milestones()[0];
        let mut update = ProgressUpdate::default();
        update.milestone_deltas.insert(id.to_string(), 1.5);
        let mut response = AgentResponse::new(AgentRole::Analysis, ResponseType::Analysis, "");
        response.progress_update = update;
        let message = Message::learner("short", 0);
        apply_turn_progress(&mut state, &[response], &classification(), &message, &TrackerConfig::default());
        assert_eq!(state.milestones.get(id).unwrap().progress, 1.0);
    }

    #[test]
    fn long_elaborate_message_advances_conversation_phase() {
        let mut state = SessionState::new("residential", "brief");
        let message = Message::learner("word ".repeat(45), 0);
        apply_turn_progress(&mut state, &[], &classification(), &message, &TrackerConfig::default());
        assert_eq!(state.conversation_phase, tutor_core::ConversationPhase::Exploration);
    }

    #[test]
    fn direct_answer_flags_feed_rolling_window() {
        let mut state = SessionState::new("residential", "brief");
        let mut c = classification();
        c.cognitive_offloading_detected = true;
        let message = Message::learner("just tell me", 0);
        apply_turn_progress(&mut state, &[], &c, &message, &TrackerConfig::default());
        assert_eq!(state.recent_direct_answer_count(), 1);
    }

    #[test]
    fn direct_answer_request_increments_profile_counter() {
        let mut state = SessionState::new("residential", "brief");
        let mut c = classification();
        c.cognitive_offloading_detected = true;
        let message = Message::learner("just tell me the answer", 0);
        apply_turn_progress(&mut state, &[], &c, &message, &TrackerConfig::default());
        assert_eq!(state.learner_profile.direct_answer_requests, 1);
    }

    #[test]
    fn elaborate_message_increments_reflective_statement_counter() {
        let mut state = SessionState::new("residential", "brief");
        let message = Message::learner("word ".repeat(45), 0);
        apply_turn_progress(&mut state, &[], &classification(), &message, &TrackerConfig::default());
        assert_eq!(state.learner_profile.reflective_statements, 1);
    }

    #[test]
    fn profile_levels_track_the_turns_classification() {
        let mut state = SessionState::new("residential", "brief");
        let mut c = classification();
        c.understanding_level = UnderstandingLevel::High;
        c.engagement_level = EngagementLevel::High;
        c.confidence_level = ConfidenceLevel::Overconfident;
        let message = Message::learner("short", 0);
        apply_turn_progress(&mut state, &[], &c, &message, &TrackerConfig::default());
        assert_eq!(state.learner_profile.skill_level, tutor_core::SkillLevel::Advanced);
        assert_eq!(state.learner_profile.engagement_level, EngagementLevel::High);
        assert_eq!(state.learner_profile.confidence_level, ConfidenceLevel::Overconfident);
    }
}
