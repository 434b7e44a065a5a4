//! Shared error, configuration, and value types for the tutoring engine.

pub mod config;
pub mod error;

pub use config::{
    GamificationConfig, LimitsConfig, LlmConfig, MetricWeights, MetricsConfig, RouterConfig,
    TrackerConfig, TutorConfig,
};
pub use error::{TutorError, TutorResult};
