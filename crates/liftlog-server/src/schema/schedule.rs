//! Schedule and current-program request/response types.

use chrono::NaiveDate;
use liftlog_core::id::ProgramId;
use liftlog_storage::CurrentProgram;
use serde::{Deserialize, Serialize};

/// Request to select the program the schedule follows and the date its
/// cycle starts.
#[derive(Debug, Clone, Deserialize)]
pub struct SetCurrentProgramRequest {
    pub program_id: ProgramId,
    pub start_date: NaiveDate,
}

/// The user's active program selection, if any.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentProgramResponse {
    pub current: Option<CurrentProgram>,
}

/// Where today falls in the active program's split.
#[derive(Debug, Clone, Serialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub index: u8,
    /// `None` on a rest day.
    pub session_name: Option<String>,
}

/// Query parameters for the upcoming-dates endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpcomingParams {
    /// Horizon in days, default eight weeks.
    #[serde(default = "default_horizon")]
    pub days: u32,
}

fn default_horizon() -> u32 {
    56
}

/// Training dates within the requested horizon.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingResponse {
    pub dates: Vec<NaiveDate>,
}
