//! `VisualArtifact` entity (spec §3).
//!
//! Analysis of the uploaded sketch/image itself is an external collaborator
//! (spec §9 open question): this crate only carries the pre-computed summary
//! through the pipeline, it never runs image analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pre-computed analysis of an uploaded artifact, produced once by an
/// external vision service and attached at upload time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualAnalysisSummary {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub identified_elements: Vec<String>,
    pub confidence: f32,
}

/// An uploaded sketch/drawing, analyzed once and referenced by later turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualArtifact {
    pub artifact_id: String,
    /// Opaque reference into the external blob store; this crate never
    /// dereferences it.
    pub content_ref: String,
    pub analysis: Option<VisualAnalysisSummary>,
    pub uploaded_at: DateTime<Utc>,
    /// Set once the Analysis agent has published the summary into
    /// `shared_context.visual_insights` (spec §4.4).
    pub analyzed_for_agents: bool,
}

impl VisualArtifact {
    pub fn new(artifact_id: impl Into<String>, content_ref: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            content_ref: content_ref.into(),
            analysis: None,
            uploaded_at: Utc::now(),
            analyzed_for_agents: false,
        }
    }

    pub fn with_analysis(mut self, analysis: VisualAnalysisSummary) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn needs_agent_analysis(&self) -> bool {
        self.analysis.is_some() && !self.analyzed_for_agents
    }
}
