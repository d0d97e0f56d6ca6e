//! The [`WorkoutStore`] trait defining the storage contract.
//!
//! Whole-tree API design:
//! - **Creation** takes a full tree with no ids anywhere and returns the
//!   canonical tree with every id populated, in creation order.
//! - **Updates** take a change-set produced by the liftlog-core diff
//!   engines. Every operation in one change-set is applied inside ONE
//!   atomic transaction (earlier steps are not idempotent relative to later
//!   ones), and the fresh canonical tree is re-read and returned.
//!
//! Unchanged nested children are never re-created by an update: their rows
//! and therefore their ids survive, which matters because logged sessions
//! reference program-session ids.
//!
//! The trait is synchronous (not async) for simplicity in the current
//! single-writer design.

use chrono::NaiveDate;

use liftlog_core::diff::program::ProgramChangeSet;
use liftlog_core::diff::session::SessionChangeSet;
use liftlog_core::id::{ProgramId, SessionId};
use liftlog_core::program::{NewProgram, Program};
use liftlog_core::session::{ExerciseSession, NewSession};

use crate::error::StorageError;
use crate::types::{CurrentProgram, UserId};

/// The storage contract for workout data.
pub trait WorkoutStore {
    // -------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------

    /// Creates a new user, returning the allocated [`UserId`].
    fn create_user(&mut self, name: &str) -> Result<UserId, StorageError>;

    /// Checks whether a user exists.
    fn user_exists(&self, user: UserId) -> Result<bool, StorageError>;

    // -------------------------------------------------------------------
    // Programs
    // -------------------------------------------------------------------

    /// Persists a full program tree and returns the canonical tree with all
    /// ids populated.
    fn create_program(
        &mut self,
        user: UserId,
        program: &NewProgram,
    ) -> Result<Program, StorageError>;

    /// Loads a complete program tree.
    fn load_program(&self, id: ProgramId) -> Result<Program, StorageError>;

    /// Lists a user's programs, full trees, in creation order.
    fn list_programs(&self, user: UserId) -> Result<Vec<Program>, StorageError>;

    /// Applies every operation of the change-set atomically, then returns
    /// the fresh canonical tree.
    fn apply_program_changes(
        &mut self,
        id: ProgramId,
        changes: &ProgramChangeSet,
    ) -> Result<Program, StorageError>;

    /// Deletes a program and its owned rows. Logged sessions that pointed
    /// at it keep their data; their program links become null.
    fn delete_program(&mut self, id: ProgramId) -> Result<(), StorageError>;

    /// Returns the owner of a program.
    fn program_owner(&self, id: ProgramId) -> Result<UserId, StorageError>;

    // -------------------------------------------------------------------
    // Logged sessions
    // -------------------------------------------------------------------

    /// Persists a full session tree and returns the canonical tree with all
    /// ids populated.
    fn create_session(
        &mut self,
        user: UserId,
        session: &NewSession,
    ) -> Result<ExerciseSession, StorageError>;

    /// Loads a complete logged session.
    fn load_session(&self, id: SessionId) -> Result<ExerciseSession, StorageError>;

    /// Lists a user's logged sessions, newest first.
    fn list_sessions(&self, user: UserId) -> Result<Vec<ExerciseSession>, StorageError>;

    /// Applies every operation of the change-set atomically, then returns
    /// the fresh canonical tree.
    fn apply_session_changes(
        &mut self,
        id: SessionId,
        changes: &SessionChangeSet,
    ) -> Result<ExerciseSession, StorageError>;

    /// Deletes a logged session and its exercises and sets.
    fn delete_session(&mut self, id: SessionId) -> Result<(), StorageError>;

    /// Returns the owner of a logged session.
    fn session_owner(&self, id: SessionId) -> Result<UserId, StorageError>;

    // -------------------------------------------------------------------
    // Current program
    // -------------------------------------------------------------------

    /// Sets which program the user's schedule follows and the date its
    /// cycle is anchored at. The program must belong to the user.
    fn set_current_program(
        &mut self,
        user: UserId,
        program: ProgramId,
        start_date: NaiveDate,
    ) -> Result<(), StorageError>;

    /// Returns the user's active program selection, if any.
    fn current_program(&self, user: UserId) -> Result<Option<CurrentProgram>, StorageError>;
}
