//! Route registration and handler bodies for the four learner-facing routes
//! (spec §6): `POST /sessions`, `POST /sessions/:id/messages`,
//! `POST /sessions/:id/artifacts`, `GET /sessions/:id/export`.

use std::net::SocketAddr;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tutor_core::VisualArtifact;
use tutor_types::error::TutorError;

use crate::dto::{
    ExportSessionResponse, PostMessageRequest, PostMessageResponse, StartSessionRequest, StartSessionResponse,
    UploadArtifactRequest, UploadArtifactResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(start_session))
        .route("/sessions/:id/messages", post(post_message))
        .route("/sessions/:id/artifacts", post(upload_artifact))
        .route("/sessions/:id/export", get(export_session))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "tutor-api listening");
    axum::serve(listener, router).await
}

async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, ApiError> {
    if request.domain.trim().is_empty() {
        return Err(ApiError(TutorError::InputInvalid("domain must not be empty".to_string())));
    }
    let design_brief = request.design_brief.unwrap_or_default();
    let session_id = state.sessions.create_session(request.domain, design_brief)?;
    Ok(Json(StartSessionResponse { session_id }))
}

async fn post_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    let handle = state.sessions.handle(&session_id)?;
    let mut session_state = handle.lock().await;
    let turn = state
        .orchestrator
        .run_turn(&mut session_state, request.text, request.attachment, CancellationToken::new())
        .await;
    drop(session_state);
    state.sessions.append_turn_record(&session_id, turn.clone()).await?;
    Ok(Json(PostMessageResponse::from_turn(turn)))
}

async fn upload_artifact(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<UploadArtifactRequest>,
) -> Result<Json<UploadArtifactResponse>, ApiError> {
    let handle = state.sessions.handle(&session_id)?;
    let artifact_id = uuid::Uuid::new_v4().to_string();
    let mut artifact = VisualArtifact::new(artifact_id.clone(), request.content_ref);
    let analysis = state.visual_analyzer.analyze(&artifact).await?;
    artifact = artifact.with_analysis(analysis);
    let mut session_state = handle.lock().await;
    session_state.add_artifact(artifact);
    Ok(Json(UploadArtifactResponse { artifact_id }))
}

async fn export_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ExportSessionResponse>, ApiError> {
    let handle = state.sessions.handle(&session_id)?;
    let session_state = handle.lock().await;
    let (domain, design_brief, created_at, phase) =
        (session_state.domain.clone(), session_state.design_brief.clone(), session_state.created_at, session_state.design_phase);
    drop(session_state);
    let turns = state.sessions.turn_records(&session_id).await?;
    let export = tutor_infra::build_session_export(session_id, domain, design_brief, created_at, phase, turns);
    Ok(Json(ExportSessionResponse(export)))
}
