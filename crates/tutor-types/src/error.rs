//! Error types for the tutoring engine.
//!
//! `TutorError` is the closed set described in spec §7: every hard failure
//! that crosses a component boundary is one of these variants, never a raw
//! `anyhow::Error` or a stringly-typed panic.

use thiserror::Error;

/// The single error type shared across the workspace.
#[derive(Error, Debug)]
pub enum TutorError {
    /// Empty or whitespace-only learner message on `post_message`.
    #[error("invalid input: {0}")]
    InputInvalid(String),

    /// LLM provider unreachable (connection refused, DNS failure, 5xx).
    #[error("LLM provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// LLM provider call exceeded its stage timeout.
    #[error("LLM provider timed out: {0}")]
    ProviderTimeout(String),

    /// LLM provider reports quota/rate-limit exhaustion. Never retried.
    #[error("LLM provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// LLM response did not match the expected schema after retries.
    #[error("LLM response malformed: {0}")]
    ProviderMalformed(String),

    /// An `AgentResponse` or `SessionState` invariant was violated.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// The caller cancelled the in-flight turn.
    #[error("turn cancelled")]
    Cancelled,

    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Lock acquisition failed (poisoned mutex/rwlock).
    #[error("lock error: {0}")]
    Lock(String),

    /// Referenced entity (session, artifact, milestone) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Catch-all for anything else; surfaced as TurnRecord.status = error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TutorError {
    /// The machine-readable error kind carried on `TurnRecord.error.kind`
    /// (spec §6, TurnRecord JSON schema).
    pub fn kind(&self) -> &'static str {
        match self {
            TutorError::InputInvalid(_) => "input_invalid",
            TutorError::ProviderUnavailable(_) => "provider_unavailable",
            TutorError::ProviderTimeout(_) => "provider_timeout",
            TutorError::ProviderQuota(_) => "provider_quota",
            TutorError::ProviderMalformed(_) => "provider_malformed",
            TutorError::ValidationFailed(_) => "validation_failed",
            TutorError::Cancelled => "cancelled",
            TutorError::Config(_) => "internal",
            TutorError::Lock(_) => "internal",
            TutorError::NotFound(_) => "internal",
            TutorError::Internal(_) => "internal",
        }
    }

    /// Whether this error kind is eligible for retry at all (spec §7: never
    /// retried: `validation_failed`, `provider_quota`).
    pub fn retryable(&self) -> bool {
        !matches!(
            self,
            TutorError::ValidationFailed(_) | TutorError::ProviderQuota(_)
        )
    }
}

impl From<serde_json::Error> for TutorError {
    fn from(error: serde_json::Error) -> Self {
        TutorError::ProviderMalformed(format!("JSON error: {error}"))
    }
}

impl From<config::ConfigError> for TutorError {
    fn from(error: config::ConfigError) -> Self {
        TutorError::Config(error.to_string())
    }
}

/// Result type for the tutoring engine.
pub type TutorResult<T> = std::result::Result<T, TutorError>;
