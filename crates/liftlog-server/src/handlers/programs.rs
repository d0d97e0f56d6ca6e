//! Program handlers (list, create, update, edit, delete).

use axum::extract::{Path, State};
use axum::Json;

use liftlog_core::diff::program::ProgramChangeSet;
use liftlog_core::id::ProgramId;
use liftlog_core::program::{NewProgram, Program, ProgramDraft};
use liftlog_storage::UserId;

use crate::error::ApiError;
use crate::schema::programs::{EditProgramResponse, ProgramListResponse};
use crate::state::AppState;

/// Lists a user's programs as full canonical trees.
///
/// `GET /users/{id}/programs`
pub async fn list_programs(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProgramListResponse>, ApiError> {
    let service = state.service.lock().await;
    let programs = service.list_programs(UserId(id))?;
    Ok(Json(ProgramListResponse { programs }))
}

/// Creates a program from a full tree with no ids; returns the canonical
/// tree with every id populated.
///
/// `POST /users/{id}/programs`
pub async fn create_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewProgram>,
) -> Result<Json<Program>, ApiError> {
    let mut service = state.service.lock().await;
    let program = service.create_program(UserId(id), req)?;
    Ok(Json(program))
}

/// Applies a client-computed change-set and returns the full canonical
/// tree, which the client substitutes wholesale for its cached copy.
///
/// `PATCH /programs/{id}`
pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<ProgramChangeSet>,
) -> Result<Json<Program>, ApiError> {
    let mut service = state.service.lock().await;
    let program = service.update_program(ProgramId(id), &changes)?;
    Ok(Json(program))
}

/// Accepts the full edited draft, diffs it against the stored tree
/// server-side, applies the result, and returns both.
///
/// `POST /programs/{id}/edits`
pub async fn edit_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<ProgramDraft>,
) -> Result<Json<EditProgramResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let (program, changes) = service.edit_program(ProgramId(id), draft)?;
    Ok(Json(EditProgramResponse { program, changes }))
}

/// Deletes a program. Logged history pointing at it survives with its
/// program links cleared.
///
/// `DELETE /programs/{id}`
pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_program(ProgramId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
