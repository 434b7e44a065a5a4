//! Pedagogical agents (spec §4.4) and the fixed roster the Orchestrator
//! dispatches a turn's routed agent list against.

pub mod analysis;
pub mod cognitive;
pub mod context;
pub mod domain;
pub mod socratic;
pub mod synthesizer;
pub mod traits;

use std::collections::HashMap;
use std::sync::Arc;

use tutor_core::AgentRole;

pub use traits::{AgentEnvironment, SharedContext, TutorAgent};

/// Build the fixed agent-role → implementation roster, analogous to the
/// teacher's agent registry lookup but with a statically known, closed set
/// of roles instead of dynamic plugin discovery.
pub fn build_roster() -> HashMap<AgentRole, Arc<dyn TutorAgent>> {
    let mut roster: HashMap<AgentRole, Arc<dyn TutorAgent>> = HashMap::new();
    roster.insert(AgentRole::Analysis, Arc::new(analysis::AnalysisAgent));
    roster.insert(AgentRole::Context, Arc::new(context::ContextAgent));
    roster.insert(AgentRole::Domain, Arc::new(domain::DomainAgent));
    roster.insert(AgentRole::Socratic, Arc::new(socratic::SocraticAgent));
    roster.insert(AgentRole::Cognitive, Arc::new(cognitive::CognitiveAgent));
    roster.insert(AgentRole::Synthesizer, Arc::new(synthesizer::SynthesizerAgent));
    roster
}
