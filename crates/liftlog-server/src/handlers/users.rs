//! User management handlers (create, overview).

use axum::extract::{Path, State};
use axum::Json;

use liftlog_storage::UserId;

use crate::error::ApiError;
use crate::schema::users::{CreateUserRequest, CreateUserResponse, OverviewResponse};
use crate::state::AppState;

/// Creates a new user.
///
/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let id = service.create_user(&req.name)?;
    Ok(Json(CreateUserResponse { id, name: req.name }))
}

/// Returns a user's programs, logged sessions (newest first), and active
/// program selection in one call.
///
/// `GET /users/{id}/overview`
pub async fn overview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let (programs, sessions, current_program) = service.overview(UserId(id))?;
    Ok(Json(OverviewResponse {
        programs,
        sessions,
        current_program,
    }))
}
