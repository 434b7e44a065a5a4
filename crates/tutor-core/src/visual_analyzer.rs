//! Visual Artifact Analyzer interface (spec §9 open question): the source
//! describes visual-artifact analysis as pre-computed without pinning
//! whether it runs in-process or behind an external service, so it is
//! modeled as a collaborator the Analysis agent depends on rather than code
//! it owns.

use async_trait::async_trait;

use crate::artifact::{VisualAnalysisSummary, VisualArtifact};
use tutor_types::error::TutorResult;

#[async_trait]
pub trait VisualAnalyzer: Send + Sync {
    async fn analyze(&self, artifact: &VisualArtifact) -> TutorResult<VisualAnalysisSummary>;
}
