//! Design-phase and conversation-phase state (spec §3, §4.5).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse stage of the learner's project lifecycle. Monotonic: a session
/// never regresses to an earlier phase (spec §3 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignPhase {
    Ideation,
    Visualization,
    Materialization,
}

impl Default for DesignPhase {
    fn default() -> Self {
        DesignPhase::Ideation
    }
}

impl DesignPhase {
    pub fn next(self) -> Option<DesignPhase> {
        match self {
            DesignPhase::Ideation => Some(DesignPhase::Visualization),
            DesignPhase::Visualization => Some(DesignPhase::Materialization),
            DesignPhase::Materialization => None,
        }
    }

    /// The ordered milestone ids for this phase. Treated as configuration in
    /// spirit (spec §9 open question) but fixed here as a sensible default
    /// set; a deployment-specific list can replace this via `MilestoneMap`
    /// construction without touching the tracker logic.
    pub fn default_milestones(self) -> &'static [&'static str] {
        match self {
            DesignPhase::Ideation => &["site_analysis", "brief_synthesis", "concept_direction"],
            DesignPhase::Visualization => &["massing_study", "spatial_organization", "facade_language"],
            DesignPhase::Materialization => &["structural_strategy", "material_palette", "detailing"],
        }
    }
}

/// Orthogonal, conversational-depth dimension (spec §3, §4.5). Advances on
/// indicator patterns, never regresses automatically but isn't subject to
/// the same "at most one in_progress" rule as design milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    Discovery,
    Exploration,
    Synthesis,
    Application,
    Reflection,
}

impl ConversationPhase {
    pub fn next(self) -> Option<ConversationPhase> {
        match self {
            ConversationPhase::Discovery => Some(ConversationPhase::Exploration),
            ConversationPhase::Exploration => Some(ConversationPhase::Synthesis),
            ConversationPhase::Synthesis => Some(ConversationPhase::Application),
            ConversationPhase::Application => Some(ConversationPhase::Reflection),
            ConversationPhase::Reflection => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneState {
    pub status: MilestoneStatus,
    pub progress: f32,
}

impl Default for MilestoneState {
    fn default() -> Self {
        Self {
            status: MilestoneStatus::NotStarted,
            progress: 0.0,
        }
    }
}

/// Milestone id -> state, ordered for deterministic iteration/serialization.
pub type MilestoneMap = BTreeMap<String, MilestoneState>;

/// Build the default milestone map for a phase, all `not_started`.
pub fn default_milestone_map(phase: DesignPhase) -> MilestoneMap {
    phase
        .default_milestones()
        .iter()
        .map(|id| (id.to_string(), MilestoneState::default()))
        .collect()
}

/// Count of milestones currently `in_progress`. Spec §3 invariant: at most
/// one per current phase.
pub fn in_progress_count(map: &MilestoneMap) -> usize {
    map.values()
        .filter(|m| m.status == MilestoneStatus::InProgress)
        .count()
}

/// Phase completion ratio: mean progress across the phase's milestones.
pub fn completion_ratio(map: &MilestoneMap) -> f32 {
    if map.is_empty() {
        return 0.0;
    }
    map.values().map(|m| m.progress).sum::<f32>() / map.len() as f32
}
