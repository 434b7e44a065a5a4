//! Classifier, router, agents, tracker, response builder, and pipeline
//! orchestrator — the pedagogical core that turns one learner message into
//! one tutor reply plus a committed `TurnRecord`.

pub mod agents;
pub mod classifier;
pub mod llm_json;
pub mod metrics_scoring;
pub mod orchestrator;
pub mod response_builder;
pub mod router;
pub mod tracker;
pub mod word_budget;

pub mod testing;

pub use agents::{AgentEnvironment, SharedContext, TutorAgent};
pub use classifier::Classifier;
pub use orchestrator::Orchestrator;
pub use router::Router;
