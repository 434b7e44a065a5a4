//! `LearnerProfile` entity (spec §3).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    Overconfident,
}

/// Learner characteristics tracked across the session. Mutated only via the
/// State Store's validated update (spec §3 invariant: counters non-negative).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LearnerProfile {
    pub skill_level: SkillLevel,
    pub engagement_level: EngagementLevel,
    pub confidence_level: ConfidenceLevel,
    pub direct_answer_requests: u32,
    pub reflective_statements: u32,
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self {
            skill_level: SkillLevel::Beginner,
            engagement_level: EngagementLevel::Medium,
            confidence_level: ConfidenceLevel::Medium,
            direct_answer_requests: 0,
            reflective_statements: 0,
        }
    }
}

impl LearnerProfile {
    pub fn record_direct_answer_request(&mut self) {
        self.direct_answer_requests = self.direct_answer_requests.saturating_add(1);
    }

    pub fn record_reflective_statement(&mut self) {
        self.reflective_statements = self.reflective_statements.saturating_add(1);
    }
}
