//! Logged-session handlers (list, create, update, edit, delete).

use axum::extract::{Path, State};
use axum::Json;

use liftlog_core::diff::session::SessionChangeSet;
use liftlog_core::id::SessionId;
use liftlog_core::session::ExerciseSession;
use liftlog_storage::UserId;

use crate::error::ApiError;
use crate::schema::sessions::{
    CreateSessionRequest, EditSessionRequest, EditSessionResponse, SessionListResponse,
};
use crate::state::AppState;

/// Lists a user's logged sessions, newest first.
///
/// `GET /users/{id}/sessions`
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let sessions = service.list_sessions(UserId(id))?;
    Ok(Json(SessionListResponse { sessions }))
}

/// Logs a new session from a full tree with no ids; weights arrive in the
/// request's display unit and are stored in kilograms.
///
/// `POST /users/{id}/sessions`
pub async fn create_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<ExerciseSession>, ApiError> {
    let mut service = state.service.lock().await;
    let session = service.create_session(UserId(id), req.unit, req.session)?;
    Ok(Json(session))
}

/// Applies a client-computed change-set (weights already in kilograms) and
/// returns the full canonical tree.
///
/// `PATCH /sessions/{sid}`
pub async fn update_session(
    State(state): State<AppState>,
    Path(sid): Path<i64>,
    Json(changes): Json<SessionChangeSet>,
) -> Result<Json<ExerciseSession>, ApiError> {
    let mut service = state.service.lock().await;
    let session = service.update_session(SessionId(sid), &changes)?;
    Ok(Json(session))
}

/// Accepts the full edited draft, diffs it against the stored tree
/// server-side, applies the result, and returns both.
///
/// `POST /sessions/{sid}/edits`
pub async fn edit_session(
    State(state): State<AppState>,
    Path(sid): Path<i64>,
    Json(req): Json<EditSessionRequest>,
) -> Result<Json<EditSessionResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let (session, changes) = service.edit_session(SessionId(sid), req.unit, req.session)?;
    Ok(Json(EditSessionResponse { session, changes }))
}

/// Deletes a logged session.
///
/// `DELETE /sessions/{sid}`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(sid): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_session(SessionId(sid))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
