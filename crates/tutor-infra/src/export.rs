//! JSON session export (spec §6): "an ordered list of TurnRecords, session
//! metadata, LearnerProfile snapshots at each turn, and aggregate metric
//! series... Field names are stable; new fields are additive; consumers
//! MUST ignore unknown fields." Every exported struct is `#[serde(default)]`
//! and never `deny_unknown_fields`, so an older consumer reading a newer
//! export degrades gracefully instead of failing to parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tutor_core::{DesignPhase, LearnerProfile, TurnRecord};

/// One point in the aggregate metric series, taken from a turn's
/// `enhancement_metrics` when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSeriesPoint {
    pub turn_index: u64,
    pub overall_cognitive_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionExport {
    pub session_id: String,
    pub domain: String,
    pub design_brief: String,
    pub created_at: DateTime<Utc>,
    pub current_design_phase: DesignPhase,
    /// `learner_profile` as of the end of each turn, same length and
    /// ordering as `turns`.
    pub learner_profile_snapshots: Vec<LearnerProfile>,
    pub metric_series: Vec<MetricSeriesPoint>,
    pub turns: Vec<TurnRecord>,
}

impl Default for SessionExport {
    fn default() -> Self {
        Self {
            session_id: String::new(),
            domain: String::new(),
            design_brief: String::new(),
            created_at: DateTime::<Utc>::from_timestamp(0, 0).expect("epoch timestamp is always valid"),
            current_design_phase: DesignPhase::Ideation,
            learner_profile_snapshots: Vec::new(),
            metric_series: Vec::new(),
            turns: Vec::new(),
        }
    }
}

/// Assemble a `SessionExport` from a session's current snapshot and its
/// committed turn log.
pub fn build_session_export(
    session_id: impl Into<String>,
    domain: impl Into<String>,
    design_brief: impl Into<String>,
    created_at: DateTime<Utc>,
    current_design_phase: DesignPhase,
    turns: Vec<TurnRecord>,
) -> SessionExport {
    let learner_profile_snapshots = turns
        .iter()
        .filter_map(|turn| turn.state_delta.as_ref().map(|delta| delta.learner_profile.clone()))
        .collect();
    let metric_series = turns
        .iter()
        .filter_map(|turn| {
            turn.enhancement_metrics
                .as_ref()
                .map(|metrics| MetricSeriesPoint { turn_index: turn.turn_index, overall_cognitive_score: metrics.overall_cognitive_score })
        })
        .collect();
    SessionExport {
        session_id: session_id.into(),
        domain: domain.into(),
        design_brief: design_brief.into(),
        created_at,
        current_design_phase,
        learner_profile_snapshots,
        metric_series,
        turns,
    }
}
