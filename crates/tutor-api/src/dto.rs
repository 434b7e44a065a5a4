//! Request/response bodies for the four learner-facing routes (spec §6),
//! one struct pair per route.

use serde::{Deserialize, Serialize};

use tutor_core::TurnRecord;
use tutor_infra::SessionExport;

/// Stable copy shown in place of a real reply whenever a turn did not reach
/// `TurnStatus::Ok` (spec §7): never leaks the raw provider/validation
/// error back to the learner.
pub const FALLBACK_MESSAGE: &str = "I had trouble composing a full reply; could you rephrase or give me a moment?";

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub domain: String,
    #[serde(default)]
    pub design_brief: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub text: String,
    #[serde(default)]
    pub attachment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub tutor_message: String,
    pub turn: TurnRecord,
}

impl PostMessageResponse {
    pub fn from_turn(turn: TurnRecord) -> Self {
        let tutor_message = turn
            .tutor_message
            .as_ref()
            .map(|message| message.text.clone())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Self { tutor_message, turn }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadArtifactRequest {
    pub content_ref: String,
}

#[derive(Debug, Serialize)]
pub struct UploadArtifactResponse {
    pub artifact_id: String,
}

#[derive(Debug, Serialize)]
pub struct ExportSessionResponse(pub SessionExport);
