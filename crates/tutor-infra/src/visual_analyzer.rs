//! HTTP-backed `VisualAnalyzer` adapter (spec §9 open question): called
//! once at artifact-upload time, never from inside the agent pipeline.

use async_trait::async_trait;
use serde_json::json;

use tutor_core::artifact::{VisualAnalysisSummary, VisualArtifact};
use tutor_core::visual_analyzer::VisualAnalyzer;
use tutor_types::error::{TutorError, TutorResult};

use crate::http::{ensure_success, HttpClient};

pub struct HttpVisualAnalyzer {
    http: HttpClient,
}

impl HttpVisualAnalyzer {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl VisualAnalyzer for HttpVisualAnalyzer {
    async fn analyze(&self, artifact: &VisualArtifact) -> TutorResult<VisualAnalysisSummary> {
        let body = json!({ "content_ref": artifact.content_ref });
        let response = self.http.post_json("analyze", &body).await?;
        let response = ensure_success(response, "visual analysis").await?;
        response
            .json::<VisualAnalysisSummary>()
            .await
            .map_err(|e| TutorError::ProviderMalformed(format!("malformed visual analysis response: {e}")))
    }
}
