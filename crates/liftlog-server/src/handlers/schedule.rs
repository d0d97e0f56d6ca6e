//! Schedule handlers: current-program selection, today's split day, and
//! upcoming training dates.

use axum::extract::{Path, Query, State};
use axum::Json;

use liftlog_storage::UserId;

use crate::error::ApiError;
use crate::schema::schedule::{
    CurrentProgramResponse, SetCurrentProgramRequest, TodayResponse, UpcomingParams,
    UpcomingResponse,
};
use crate::state::AppState;

/// Returns the user's active program selection.
///
/// `GET /users/{id}/current-program`
pub async fn get_current_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CurrentProgramResponse>, ApiError> {
    let service = state.service.lock().await;
    let current = service.current_program(UserId(id))?;
    Ok(Json(CurrentProgramResponse { current }))
}

/// Selects the program the schedule follows and anchors its cycle.
///
/// `PUT /users/{id}/current-program`
pub async fn set_current_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SetCurrentProgramRequest>,
) -> Result<Json<CurrentProgramResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let current = service.set_current_program(UserId(id), req.program_id, req.start_date)?;
    Ok(Json(CurrentProgramResponse {
        current: Some(current),
    }))
}

/// Which split day today falls on, and the session assigned to it.
///
/// `GET /users/{id}/schedule/today`
pub async fn today(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TodayResponse>, ApiError> {
    let service = state.service.lock().await;
    let (date, day) = service.schedule_today(UserId(id))?;
    Ok(Json(TodayResponse {
        date,
        index: day.index,
        session_name: day.session_name,
    }))
}

/// Training dates within the requested horizon (default eight weeks).
///
/// `GET /users/{id}/schedule/upcoming?days=N`
pub async fn upcoming(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UpcomingParams>,
) -> Result<Json<UpcomingResponse>, ApiError> {
    let service = state.service.lock().await;
    let dates = service.schedule_upcoming(UserId(id), params.days)?;
    Ok(Json(UpcomingResponse { dates }))
}
