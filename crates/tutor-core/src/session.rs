//! `SessionState` entity and its validated-mutation API (spec §3).
//!
//! All mutation goes through methods on this struct so the invariants listed
//! in spec §3 hold by construction; the State Store (tutor-infra) is
//! responsible for the transactional commit/rollback around a turn, not for
//! re-deriving these rules.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artifact::VisualArtifact;
use crate::message::Message;
use crate::phase::{
    completion_ratio, default_milestone_map, in_progress_count, ConversationPhase, DesignPhase,
    MilestoneMap, MilestoneStatus,
};
use crate::profile::LearnerProfile;

/// Bound on `agent_context` entries (spec §3 invariant: keys typed and
/// bounded in size).
pub const MAX_AGENT_CONTEXT_ENTRIES: usize = 64;
pub const MAX_AGENT_CONTEXT_VALUE_BYTES: usize = 16 * 1024;

/// The mutable state owned by one learner session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub domain: String,
    pub design_brief: String,
    pub messages: Vec<Message>,
    pub learner_profile: LearnerProfile,
    pub design_phase: DesignPhase,
    /// Highest design phase reached so far; `design_phase` is derived from
    /// this and never allowed below it (spec §3 invariant).
    max_design_phase_reached: DesignPhase,
    pub phase_progress: f32,
    pub milestones: MilestoneMap,
    pub conversation_phase: ConversationPhase,
    pub agent_context: HashMap<String, serde_json::Value>,
    pub artifacts: HashMap<String, VisualArtifact>,
    pub interaction_counter: u64,
    pub created_at: DateTime<Utc>,
    /// Recent dominant design dimensions, most recent last, used by the
    /// Classifier's topic-transition detection (spec §4.2).
    pub previous_dominant_dimensions: Vec<crate::classification::DesignDimension>,
    /// Rolling count of direct-answer requests in the last 5 turns (spec
    /// §4.2 cognitive-offloading rule).
    pub recent_direct_answer_flags: Vec<bool>,
}

impl SessionState {
    pub fn new(domain: impl Into<String>, design_brief: impl Into<String>) -> Self {
        let session_id = Uuid::new_v4().to_string();
        Self {
            session_id,
            domain: domain.into(),
            design_brief: design_brief.into(),
            messages: Vec::new(),
            learner_profile: LearnerProfile::default(),
            design_phase: DesignPhase::Ideation,
            max_design_phase_reached: DesignPhase::Ideation,
            phase_progress: 0.0,
            milestones: default_milestone_map(DesignPhase::Ideation),
            conversation_phase: ConversationPhase::Discovery,
            agent_context: HashMap::new(),
            artifacts: HashMap::new(),
            interaction_counter: 0,
            created_at: Utc::now(),
            previous_dominant_dimensions: Vec::new(),
            recent_direct_answer_flags: Vec::new(),
        }
    }

    pub fn next_turn_index(&self) -> u64 {
        self.messages.len() as u64
    }

    /// Advance the running interaction counter (spec §3) and return the
    /// pre-increment value, suitable as a contiguous per-turn record index
    /// (unlike `next_turn_index`, which counts messages and so jumps by two
    /// per committed turn).
    pub fn record_interaction(&mut self) -> u64 {
        let index = self.interaction_counter;
        self.interaction_counter += 1;
        index
    }

    pub fn learner_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m.author, crate::message::Author::Learner))
            .count()
    }

    /// Append a message; enforces the strictly-increasing turn_index
    /// invariant (spec §3, §8).
    pub fn append_message(&mut self, message: Message) -> Result<(), String> {
        let expected = self.next_turn_index();
        if message.turn_index != expected {
            return Err(format!(
                "turn_index {} is not contiguous (expected {})",
                message.turn_index, expected
            ));
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn set_agent_context(&mut self, key: impl Into<String>, value: serde_json::Value) -> Result<(), String> {
        let key = key.into();
        let size = serde_json::to_string(&value).map(|s| s.len()).unwrap_or(usize::MAX);
        if size > MAX_AGENT_CONTEXT_VALUE_BYTES {
            return Err(format!("agent_context value for '{key}' exceeds size bound"));
        }
        if !self.agent_context.contains_key(&key) && self.agent_context.len() >= MAX_AGENT_CONTEXT_ENTRIES {
            return Err("agent_context entry limit reached".to_string());
        }
        self.agent_context.insert(key, value);
        Ok(())
    }

    /// Apply a milestone progress delta with clamping and the non-regression
    /// rule (spec §3, §4.5: "reject regressions, log an invariant
    /// violation"). Returns `true` if the update was applied as-is, `false`
    /// if it was a rejected regression (silently clamped to the prior
    /// value).
    pub fn apply_milestone_progress(&mut self, milestone_id: &str, proposed_progress: f32) -> bool {
        let Some(state) = self.milestones.get_mut(milestone_id) else {
            return false;
        };
        let clamped = proposed_progress.clamp(0.0, 1.0);
        if clamped < state.progress {
            tracing::warn!(
                session_id = %self.session_id,
                milestone_id,
                current = state.progress,
                proposed = clamped,
                "rejected milestone progress regression"
            );
            return false;
        }
        state.progress = clamped;
        if clamped >= 1.0 {
            state.status = MilestoneStatus::Completed;
        } else if clamped > 0.0 && state.status == MilestoneStatus::NotStarted {
            state.status = MilestoneStatus::InProgress;
        }
        true
    }

    /// Spec §3 invariant: at most one `in_progress` milestone per phase.
    pub fn has_single_in_progress_milestone(&self) -> bool {
        in_progress_count(&self.milestones) <= 1
    }

    pub fn phase_completion_ratio(&self) -> f32 {
        completion_ratio(&self.milestones)
    }

    /// Advance the design phase if the completion threshold is met and a
    /// readiness signal is present (spec §4.5). Never regresses.
    pub fn maybe_advance_phase(&mut self, completion_threshold: f32, readiness_signal: bool) -> bool {
        if readiness_signal && self.phase_completion_ratio() >= completion_threshold {
            if let Some(next) = self.design_phase.next() {
                self.design_phase = next;
                if next > self.max_design_phase_reached {
                    self.max_design_phase_reached = next;
                }
                self.milestones = default_milestone_map(next);
                self.phase_progress = 0.0;
                return true;
            }
        }
        false
    }

    pub fn set_phase_progress(&mut self, proposed: f32) {
        let clamped = proposed.clamp(0.0, 1.0);
        if clamped >= self.phase_progress {
            self.phase_progress = clamped;
        } else {
            tracing::warn!(
                session_id = %self.session_id,
                current = self.phase_progress,
                proposed = clamped,
                "rejected phase_progress regression"
            );
        }
    }

    pub fn maybe_advance_conversation_phase(&mut self, should_advance: bool) -> bool {
        if should_advance {
            if let Some(next) = self.conversation_phase.next() {
                self.conversation_phase = next;
                return true;
            }
        }
        false
    }

    pub fn record_direct_answer_flag(&mut self, is_direct_answer_request: bool) {
        self.recent_direct_answer_flags.push(is_direct_answer_request);
        if self.recent_direct_answer_flags.len() > 5 {
            self.recent_direct_answer_flags.remove(0);
        }
    }

    /// Spec §4.2: "learner recently asked >= 3 direct answers in last 5
    /// turns".
    pub fn recent_direct_answer_count(&self) -> usize {
        self.recent_direct_answer_flags.iter().filter(|b| **b).count()
    }

    pub fn push_dominant_dimensions(&mut self, dims: Vec<crate::classification::DesignDimension>) {
        self.previous_dominant_dimensions = dims;
    }

    pub fn add_artifact(&mut self, artifact: VisualArtifact) {
        self.artifacts.insert(artifact.artifact_id.clone(), artifact);
    }

    /// Mark an artifact's analysis as published to the agent pipeline, so the
    /// Analysis agent doesn't keep re-surfacing it on every later turn (spec
    /// §4.4).
    pub fn mark_artifact_analyzed(&mut self, artifact_id: &str) {
        if let Some(artifact) = self.artifacts.get_mut(artifact_id) {
            artifact.analyzed_for_agents = true;
        }
    }

    /// Invariant check used by the Response Builder / State Store before a
    /// commit (spec §8).
    pub fn validate_invariants(&self) -> Result<(), String> {
        let mut prev_turn_index: Option<u64> = None;
        for message in &self.messages {
            if let Some(prev) = prev_turn_index {
                if message.turn_index <= prev {
                    return Err("message turn_index is not strictly increasing".to_string());
                }
            }
            prev_turn_index = Some(message.turn_index);
        }
        if self.design_phase < self.max_design_phase_reached {
            return Err("design_phase regressed below its maximum reached value".to_string());
        }
        if !self.has_single_in_progress_milestone() {
            return Err("more than one milestone in_progress for the current phase".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn append_message_enforces_contiguous_turn_index() {
        let mut state = SessionState::new("residential", "brief");
        state.append_message(Message::learner("hi", 0)).unwrap();
        let err = state.append_message(Message::learner("again", 2)).unwrap_err();
        assert!(err.contains("not contiguous"));
    }

    #[test]
    fn milestone_progress_never_regresses() {
        let mut state = SessionState::new("residential", "brief");
        let id = DesignPhase::Ideation.default_milestones()[0];
        assert!(state.apply_milestone_progress(id, 0.5));
        assert!(!state.apply_milestone_progress(id, 0.2));
        assert_eq!(state.milestones.get(id).unwrap().progress, 0.5);
    }

    #[test]
    fn phase_progress_never_regresses() {
        let mut state = SessionState::new("residential", "brief");
        state.set_phase_progress(0.6);
        state.set_phase_progress(0.3);
        assert_eq!(state.phase_progress, 0.6);
    }

    #[test]
    fn phase_advances_only_with_readiness_and_threshold() {
        let mut state = SessionState::new("residential", "brief");
        for id in DesignPhase::Ideation.default_milestones() {
            state.apply_milestone_progress(id, 1.0);
        }
        assert!(!state.maybe_advance_phase(0.8, false));
        assert_eq!(state.design_phase, DesignPhase::Ideation);
        assert!(state.maybe_advance_phase(0.8, true));
        assert_eq!(state.design_phase, DesignPhase::Visualization);
    }

    #[test]
    fn phase_never_regresses_below_max_reached() {
        let mut state = SessionState::new("residential", "brief");
        for id in DesignPhase::Ideation.default_milestones() {
            state.apply_milestone_progress(id, 1.0);
        }
        state.maybe_advance_phase(0.8, true);
        assert_eq!(state.design_phase, DesignPhase::Visualization);
        // Nothing in the public API allows moving design_phase backward; the
        // invariant check guards against it if state were ever constructed
        // inconsistently (e.g. via deserialization of a tampered export).
        state.design_phase = DesignPhase::Ideation;
        assert!(state.validate_invariants().is_err());
    }

    #[test]
    fn record_interaction_returns_contiguous_pre_increment_index() {
        let mut state = SessionState::new("residential", "brief");
        assert_eq!(state.record_interaction(), 0);
        assert_eq!(state.record_interaction(), 1);
        assert_eq!(state.interaction_counter, 2);
    }

    #[test]
    fn recent_direct_answer_window_is_five_turns() {
        let mut state = SessionState::new("residential", "brief");
        for flag in [true, true, true, false, false, true] {
            state.record_direct_answer_flag(flag);
        }
        assert_eq!(state.recent_direct_answer_flags.len(), 5);
        assert_eq!(state.recent_direct_answer_count(), 3);
    }
}
