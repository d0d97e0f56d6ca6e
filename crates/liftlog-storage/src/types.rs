//! Storage-layer types for user identity and the current-program setting.
//!
//! [`UserId`] is defined here (not in liftlog-core) because user identity is
//! a storage concern -- the diff engines never see users, only trees.

use std::fmt;

use chrono::NaiveDate;
use liftlog_core::id::ProgramId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a stored user.
///
/// The inner `i64` aligns with SQLite's `INTEGER PRIMARY KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's active program selection: which program the schedule follows
/// and the date its split cycle is anchored at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentProgram {
    pub program_id: ProgramId,
    pub program_name: String,
    pub start_date: NaiveDate,
}
