//! `Message` entity (spec §3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a `Message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    Learner,
    Tutor,
}

/// A single append-only message in a session's transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Message {
    pub author: Author,
    pub text: String,
    pub attached_artifact: Option<String>,
    pub turn_index: u64,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn learner(text: impl Into<String>, turn_index: u64) -> Self {
        Self {
            author: Author::Learner,
            text: text.into(),
            attached_artifact: None,
            turn_index,
            timestamp: Utc::now(),
        }
    }

    pub fn tutor(text: impl Into<String>, turn_index: u64) -> Self {
        Self {
            author: Author::Tutor,
            text: text.into(),
            attached_artifact: None,
            turn_index,
            timestamp: Utc::now(),
        }
    }

    pub fn with_artifact(mut self, artifact_id: impl Into<String>) -> Self {
        self.attached_artifact = Some(artifact_id.into());
        self
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Spec §4.2 edge case: messages over 100 words are a "detailed brief".
    pub fn is_detailed_brief(&self) -> bool {
        self.word_count() > 100
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
