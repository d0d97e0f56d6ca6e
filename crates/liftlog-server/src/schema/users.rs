//! User management request/response types.

use liftlog_core::program::Program;
use liftlog_core::session::ExerciseSession;
use liftlog_storage::{CurrentProgram, UserId};
use serde::{Deserialize, Serialize};

/// Request to create a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

/// Response after creating a user.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserResponse {
    pub id: UserId,
    pub name: String,
}

/// Everything a client needs after sign-in: full program trees, logged
/// sessions newest first, and the active program selection.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewResponse {
    pub programs: Vec<Program>,
    pub sessions: Vec<ExerciseSession>,
    pub current_program: Option<CurrentProgram>,
}
