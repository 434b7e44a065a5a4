//! Test doubles shared by this crate's unit tests and the workspace's
//! end-to-end scenario tests (spec §8).

use std::sync::Mutex;

use async_trait::async_trait;
use tutor_core::{
    ChatMessage, CompletionOptions, KnowledgeSnippet, KnowledgeStore, LlmGateway, VisualAnalysisSummary,
    VisualAnalyzer, VisualArtifact,
};
use tutor_types::error::{TutorError, TutorResult};

/// A gateway that always errors; used where a test asserts the LLM is never
/// called (pattern-matched layer-1 classification, blank input, etc).
pub struct NullLlmGateway;

#[async_trait]
impl LlmGateway for NullLlmGateway {
    async fn complete(&self, _messages: &[ChatMessage], _options: &CompletionOptions) -> TutorResult<String> {
        Err(TutorError::Internal("NullLlmGateway was called but no script was configured".to_string()))
    }

    async fn embed(&self, _texts: &[String]) -> TutorResult<Vec<Vec<f32>>> {
        Err(TutorError::Internal("NullLlmGateway was called but no script was configured".to_string()))
    }
}

/// Returns a fixed, scripted sequence of `complete` responses, one per call,
/// cycling the last entry once exhausted. Lets a test pin exactly what the
/// LLM "says" at each pipeline stage without a real provider.
pub struct ScriptedLlmGateway {
    responses: Mutex<Vec<String>>,
    cursor: Mutex<usize>,
}

impl ScriptedLlmGateway {
    pub fn new(responses: Vec<String>) -> Self {
        Self { responses: Mutex::new(responses), cursor: Mutex::new(0) }
    }
}

#[async_trait]
impl LlmGateway for ScriptedLlmGateway {
    async fn complete(&self, _messages: &[ChatMessage], _options: &CompletionOptions) -> TutorResult<String> {
        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(TutorError::ProviderUnavailable("no scripted responses".to_string()));
        }
        let mut cursor = self.cursor.lock().unwrap();
        let index = (*cursor).min(responses.len() - 1);
        *cursor += 1;
        Ok(responses[index].clone())
    }

    async fn embed(&self, texts: &[String]) -> TutorResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.0_f32; 8]).collect())
    }
}

/// A knowledge store that returns a fixed snippet set regardless of query,
/// and never performs a live web search.
pub struct FixedKnowledgeStore {
    snippets: Vec<KnowledgeSnippet>,
}

impl FixedKnowledgeStore {
    pub fn new(snippets: Vec<KnowledgeSnippet>) -> Self {
        Self { snippets }
    }

    pub fn empty() -> Self {
        Self { snippets: Vec::new() }
    }
}

#[async_trait]
impl KnowledgeStore for FixedKnowledgeStore {
    async fn search(&self, _query: &str, k: usize) -> TutorResult<Vec<KnowledgeSnippet>> {
        Ok(self.snippets.iter().take(k).cloned().collect())
    }
}

/// Always reports a generic, low-confidence analysis; used where a test
/// doesn't care about visual-artifact content.
pub struct StubVisualAnalyzer;

#[async_trait]
impl VisualAnalyzer for StubVisualAnalyzer {
    async fn analyze(&self, _artifact: &VisualArtifact) -> TutorResult<VisualAnalysisSummary> {
        Ok(VisualAnalysisSummary {
            strengths: vec!["clear massing diagram".to_string()],
            weaknesses: vec!["circulation not yet legible".to_string()],
            identified_elements: vec!["site boundary".to_string()],
            confidence: 0.5,
        })
    }
}
