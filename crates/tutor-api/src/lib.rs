//! Learner-facing HTTP API (spec §6): four JSON routes over the
//! `Orchestrator` pipeline and the in-process `StateStore`.

pub mod dto;
pub mod error;
pub mod state;
pub mod web_server;

pub use error::ApiError;
pub use state::AppState;
pub use web_server::{build_router, serve};
