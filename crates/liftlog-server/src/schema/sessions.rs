//! Logged-session request/response types.
//!
//! Drafts carry weights in the client's display unit, so the create and
//! edit bodies name that unit alongside the tree. Raw change-set updates
//! (`PATCH /sessions/{sid}`) are already in kilograms -- unit conversion is
//! the diff engine's job, not the transport's.

use liftlog_core::diff::session::SessionChangeSet;
use liftlog_core::session::{ExerciseSession, SessionDraft};
use liftlog_core::units::WeightUnit;
use serde::{Deserialize, Serialize};

/// Request to log a new session. `unit` defaults to kilograms.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub unit: WeightUnit,
    pub session: SessionDraft,
}

/// Request to edit a session by submitting the full edited draft.
#[derive(Debug, Clone, Deserialize)]
pub struct EditSessionRequest {
    #[serde(default)]
    pub unit: WeightUnit,
    pub session: SessionDraft,
}

/// Response listing a user's sessions, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<ExerciseSession>,
}

/// Response to a server-side edit: the fresh canonical tree plus the
/// change-set the diff engine computed for it.
#[derive(Debug, Clone, Serialize)]
pub struct EditSessionResponse {
    pub session: ExerciseSession,
    pub changes: SessionChangeSet,
}
