//! Axum route handlers for the intake workflow.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::catalog::{intake_catalog, IntakeCatalog};
use crate::intake::models::{FullIntakeForm, IntakePath, QuickLookupForm};
use crate::llm_client::GenerationResult;
use crate::presenter::{present_session, render, RenderedResult, SessionView};
use crate::state::AppState;
use crate::workflow::pipeline::{submit_lookup, submit_strategy};

#[derive(Debug, Deserialize)]
pub struct SelectPathRequest {
    pub path: IntakePath,
}

/// GET /api/v1/catalog
pub async fn handle_get_catalog() -> Json<IntakeCatalog> {
    Json(intake_catalog())
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(present_session(&session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(session_id).await?;
    Ok(Json(present_session(&session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/path
pub async fn handle_select_path(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SelectPathRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.set_path(session_id, req.path).await?;
    Ok(Json(present_session(&session)))
}

/// POST /api/v1/sessions/:id/strategy
///
/// Blocks until the generation service answers. A failed generation still
/// returns 200 with an error rendering; only a rejected form returns 400.
pub async fn handle_submit_strategy(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(form): Json<FullIntakeForm>,
) -> Result<Json<SessionView>, AppError> {
    let view = submit_strategy(&state, session_id, &form).await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/lookup
pub async fn handle_submit_lookup(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(form): Json<QuickLookupForm>,
) -> Result<Json<SessionView>, AppError> {
    let view = submit_lookup(&state, session_id, &form).await?;
    Ok(Json(view))
}

/// GET /api/v1/sessions/:id/results/:path
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path((session_id, path)): Path<(Uuid, IntakePath)>,
) -> Result<Json<RenderedResult>, AppError> {
    let result = state.sessions.get_result(session_id, path).await?;
    Ok(Json(render(result.as_ref())))
}

/// GET /api/v1/sessions/:id/results/:path/markdown
///
/// Raw markdown of the last successful result, for clients that render it themselves.
pub async fn handle_get_result_markdown(
    State(state): State<AppState>,
    Path((session_id, path)): Path<(Uuid, IntakePath)>,
) -> Result<impl IntoResponse, AppError> {
    match state.sessions.get_result(session_id, path).await? {
        Some(GenerationResult::Success { text }) => Ok((
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            text,
        )),
        _ => Err(AppError::NotFound(format!(
            "No successful result for path {path} in session {session_id}"
        ))),
    }
}
