//! Domain model and external-collaborator traits for the tutoring engine.
//!
//! This crate has no knowledge of HTTP, LLM providers, or persistence — it
//! defines the entities in spec §3 and the two trait boundaries (`LlmGateway`,
//! `KnowledgeStore`) that `tutor-infra` implements and `tutor-cognitive`
//! consumes.

pub mod agent_response;
pub mod artifact;
pub mod classification;
pub mod gateway;
pub mod knowledge;
pub mod message;
pub mod metrics;
pub mod phase;
pub mod profile;
pub mod routing;
pub mod session;
pub mod turn_record;
pub mod visual_analyzer;

pub use agent_response::{AgentResponse, AgentRole, CognitiveFlag, ProgressUpdate, ResponseType};
pub use artifact::{VisualAnalysisSummary, VisualArtifact};
pub use classification::{
    Classification, DesignDimension, DesignDimensionSet, InputType, UnderstandingLevel, UserIntent,
};
pub use gateway::{ChatMessage, CompletionOptions, LlmGateway};
pub use knowledge::{KnowledgeSnippet, KnowledgeStore, WebSearchResult};
pub use message::{Author, Message};
pub use metrics::EnhancementMetrics;
pub use phase::{
    default_milestone_map, ConversationPhase, DesignPhase, MilestoneMap, MilestoneState,
    MilestoneStatus,
};
pub use profile::{ConfidenceLevel, EngagementLevel, LearnerProfile, SkillLevel};
pub use routing::{Route, RoutingDecision, SubMode};
pub use session::SessionState;
pub use turn_record::{
    AgentOutputSummary, MilestoneProgressDelta, RoutingSummary, StateDelta, TimingsMs, TurnError,
    TurnRecord, TurnStatus,
};
pub use visual_analyzer::VisualAnalyzer;
