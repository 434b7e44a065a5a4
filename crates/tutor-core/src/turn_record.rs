//! `TurnRecord` entity (spec §3, §6) — the immutable per-turn fact.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent_response::{AgentRole, CognitiveFlag, ResponseType};
use crate::classification::Classification;
use crate::message::Message;
use crate::metrics::EnhancementMetrics;
use crate::phase::{ConversationPhase, DesignPhase};
use crate::profile::LearnerProfile;
use crate::routing::{Route, SubMode};

/// Terminal status of a turn (spec §6, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Ok,
    Error,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TurnError {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoutingSummary {
    pub route: Route,
    pub rule_id: String,
    pub confidence: f32,
    pub reason: String,
    pub sub_mode: SubMode,
    pub agents_used: Vec<AgentRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentOutputSummary {
    pub agent_name: AgentRole,
    pub response_type: ResponseType,
    pub summary: String,
    pub cognitive_flags: Vec<CognitiveFlag>,
    pub metadata: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MilestoneProgressDelta {
    pub milestone_id: String,
    pub progress: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StateDelta {
    pub phase: DesignPhase,
    pub phase_progress: f32,
    pub milestone_progress: Vec<MilestoneProgressDelta>,
    pub conversation_phase: ConversationPhase,
    pub learner_profile: LearnerProfile,
    pub milestone_questions_asked: u32,
    pub milestone_responses_graded: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimingsMs {
    pub classify: u64,
    pub route: u64,
    pub agents: HashMap<String, u64>,
    pub synthesize: u64,
    pub total: u64,
}

/// The immutable per-turn fact appended exactly once per turn (spec §3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TurnRecord {
    pub session_id: String,
    pub turn_index: u64,
    pub timestamp: DateTime<Utc>,
    pub user_message: Message,
    pub tutor_message: Option<Message>,
    pub tutor_response_type: Option<ResponseType>,
    pub classification: Option<Classification>,
    pub routing: Option<RoutingSummary>,
    pub agent_outputs: Vec<AgentOutputSummary>,
    pub enhancement_metrics: Option<EnhancementMetrics>,
    pub state_delta: Option<StateDelta>,
    pub timings_ms: TimingsMs,
    pub status: TurnStatus,
    pub error: Option<TurnError>,
}

impl TurnRecord {
    pub fn ok(
        session_id: impl Into<String>,
        turn_index: u64,
        user_message: Message,
        tutor_message: Message,
        tutor_response_type: ResponseType,
        classification: Classification,
        routing: RoutingSummary,
        agent_outputs: Vec<AgentOutputSummary>,
        enhancement_metrics: EnhancementMetrics,
        state_delta: StateDelta,
        timings_ms: TimingsMs,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            turn_index,
            timestamp: Utc::now(),
            user_message,
            tutor_message: Some(tutor_message),
            tutor_response_type: Some(tutor_response_type),
            classification: Some(classification),
            routing: Some(routing),
            agent_outputs,
            enhancement_metrics: Some(enhancement_metrics),
            state_delta: Some(state_delta),
            timings_ms,
            status: TurnStatus::Ok,
            error: None,
        }
    }

    pub fn failed(
        session_id: impl Into<String>,
        turn_index: u64,
        user_message: Message,
        status: TurnStatus,
        error: TurnError,
        timings_ms: TimingsMs,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            turn_index,
            timestamp: Utc::now(),
            user_message,
            tutor_message: None,
            tutor_response_type: None,
            classification: None,
            routing: None,
            agent_outputs: Vec::new(),
            enhancement_metrics: None,
            state_delta: None,
            timings_ms,
            status,
            error: Some(error),
        }
    }
}
