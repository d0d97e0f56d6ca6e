//! Stable ID newtypes for persisted entities.
//!
//! All IDs are distinct newtype wrappers over `i64` (aligned with SQLite's
//! `INTEGER PRIMARY KEY`), providing type safety so that a `ProgramSessionId`
//! cannot be accidentally used where an `ExerciseId` is expected.
//!
//! An entity carrying `Option<...Id> = None` has never been persisted and
//! must be created by the storage layer; `Some(id)` refers to an existing
//! row. Matching between an original tree and an edited tree is done
//! strictly by these ids, never by position or name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a training program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramId(pub i64);

/// Identifies a session template within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramSessionId(pub i64);

/// Identifies a superset slot row within a program session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramSetId(pub i64);

/// Identifies a day-in-cycle assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitIndexId(pub i64);

/// Identifies a logged exercise session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub i64);

/// Identifies a logged exercise within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExerciseId(pub i64);

/// Identifies a logged set within an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetId(pub i64);

// Display implementations -- just print the inner value.

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProgramSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProgramSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SplitIndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_display() {
        assert_eq!(format!("{}", ProgramId(7)), "7");
        assert_eq!(format!("{}", SessionId(42)), "42");
        assert_eq!(format!("{}", SetId(0)), "0");
    }

    #[test]
    fn serde_roundtrip() {
        let id = ProgramSessionId(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: ProgramSessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
