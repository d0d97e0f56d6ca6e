//! Core error types for liftlog-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! all anticipated failure modes in draft validation and diffing.

use crate::id::ExerciseId;
use thiserror::Error;

/// Core errors produced by the liftlog-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A name field was empty or longer than 16 characters.
    #[error("{what} must be 1-16 characters, got '{name}'")]
    InvalidName { what: &'static str, name: String },

    /// The split cycle length was outside 1..=14.
    #[error("split length must be between 1 and 14, got {value}")]
    SplitLengthOutOfRange { value: u8 },

    /// A day-in-cycle index was outside the program's split.
    #[error("split index {value} is outside the {split_length}-day split")]
    SplitIndexOutOfRange { value: u8, split_length: u8 },

    /// The same day-in-cycle was assigned to more than one session.
    #[error("split index {value} is assigned to more than one session")]
    DuplicateSplitIndex { value: u8 },

    /// A split-index entry pointed past the end of the session list.
    #[error("session index {value} is out of bounds for {sessions} session(s)")]
    SessionIndexOutOfBounds { value: usize, sessions: usize },

    /// A list that must contain at least one entry was empty.
    #[error("{what} must not be empty")]
    EmptyList { what: &'static str },

    /// A set number was outside 1..=10.
    #[error("set number must be between 1 and 10, got {value}")]
    SetNumberOutOfRange { value: u32 },

    /// A rep count was outside 1..=999.
    #[error("reps must be between 1 and 999, got {value}")]
    RepsOutOfRange { value: u32 },

    /// A weight was negative or above 9999.
    #[error("weight must be between 0 and 9999, got {value}")]
    WeightOutOfRange { value: f64 },

    /// Only one of program id / program-session id was supplied.
    /// Linking a logged session to a program requires both.
    #[error("program id and program session id must be set together")]
    ProgramLinkIncomplete,

    /// An edited exercise referenced an id the original tree does not have.
    /// The form was built against a stale snapshot.
    #[error("unknown exercise id {id} in edited session")]
    UnknownExerciseId { id: ExerciseId },
}
