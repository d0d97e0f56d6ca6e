//! Program request/response types.
//!
//! The create body is the full-tree creation payload
//! ([`liftlog_core::program::NewProgram`], no ids anywhere); the update body
//! is a [`ProgramChangeSet`]; the edit body is a full
//! [`liftlog_core::program::ProgramDraft`] which the server diffs against
//! the stored tree itself.

use liftlog_core::diff::program::ProgramChangeSet;
use liftlog_core::program::Program;
use serde::Serialize;

/// Response listing a user's programs as full canonical trees.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramListResponse {
    pub programs: Vec<Program>,
}

/// Response to a server-side edit: the fresh canonical tree plus the
/// change-set the diff engine computed for it.
#[derive(Debug, Clone, Serialize)]
pub struct EditProgramResponse {
    pub program: Program,
    pub changes: ProgramChangeSet,
}
