//! Shared application state handed to every axum handler.

use std::sync::Arc;

use tutor_core::VisualAnalyzer;
use tutor_cognitive::Orchestrator;
use tutor_infra::StateStore;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub sessions: Arc<StateStore>,
    pub visual_analyzer: Arc<dyn VisualAnalyzer>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, sessions: Arc<StateStore>, visual_analyzer: Arc<dyn VisualAnalyzer>) -> Self {
        Self { orchestrator, sessions, visual_analyzer }
    }
}
