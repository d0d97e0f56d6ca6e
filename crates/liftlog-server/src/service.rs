//! WorkoutService: the single coordinator between HTTP handlers and the
//! core/storage crates.
//!
//! All business logic flows through [`WorkoutService`]. Handlers are thin
//! wrappers that delegate to these methods.
//!
//! The service holds the SQLite store plus an explicit per-user cache of
//! logged sessions in reverse-chronological order. The cache is only ever
//! updated from canonical trees the store returned -- a failed apply rolls
//! back inside the store and leaves the cache untouched. An empty
//! change-set short-circuits before reaching the store at all.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use liftlog_core::diff::program::{diff_program, ProgramChangeSet};
use liftlog_core::diff::session::{diff_session, SessionChangeSet};
use liftlog_core::id::{ProgramId, SessionId};
use liftlog_core::program::{NewProgram, Program, ProgramDraft};
use liftlog_core::schedule::{current_split_day, future_session_dates, SplitDay};
use liftlog_core::session::{ExerciseSession, SessionDraft};
use liftlog_core::timeline::insert_and_resort;
use liftlog_core::units::WeightUnit;
use liftlog_storage::{CurrentProgram, SqliteStore, UserId, WorkoutStore};

use crate::error::ApiError;

/// The central service coordinating validation, diffing, persistence, and
/// the session list cache.
pub struct WorkoutService {
    /// SQLite storage backend.
    store: SqliteStore,
    /// Per-user logged sessions, newest first. Populated lazily, replaced
    /// entry-by-entry with the canonical trees updates return.
    sessions: HashMap<UserId, Vec<ExerciseSession>>,
}

impl WorkoutService {
    /// Creates a new WorkoutService, opening a SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)
            .map_err(|e| ApiError::InternalError(format!("failed to open database: {}", e)))?;
        Ok(WorkoutService {
            store,
            sessions: HashMap::new(),
        })
    }

    /// Creates a new WorkoutService backed by an in-memory database (for
    /// testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let store = SqliteStore::in_memory()
            .map_err(|e| ApiError::InternalError(format!("failed to open database: {}", e)))?;
        Ok(WorkoutService {
            store,
            sessions: HashMap::new(),
        })
    }

    // -------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------

    pub fn create_user(&mut self, name: &str) -> Result<UserId, ApiError> {
        if name.is_empty() {
            return Err(ApiError::ValidationFailed(
                "user name must not be empty".to_string(),
            ));
        }
        Ok(self.store.create_user(name)?)
    }

    /// Everything a client needs after sign-in: programs, logged sessions
    /// newest first, and the active program selection.
    pub fn overview(
        &mut self,
        user: UserId,
    ) -> Result<(Vec<Program>, Vec<ExerciseSession>, Option<CurrentProgram>), ApiError> {
        let programs = self.store.list_programs(user)?;
        let sessions = self.list_sessions(user)?;
        let current = self.store.current_program(user)?;
        Ok((programs, sessions, current))
    }

    // -------------------------------------------------------------------
    // Programs
    // -------------------------------------------------------------------

    pub fn list_programs(&self, user: UserId) -> Result<Vec<Program>, ApiError> {
        Ok(self.store.list_programs(user)?)
    }

    pub fn create_program(
        &mut self,
        user: UserId,
        program: NewProgram,
    ) -> Result<Program, ApiError> {
        program.validate()?;
        Ok(self.store.create_program(user, &program)?)
    }

    /// Applies a client-computed change-set. A no-op change-set touches
    /// nothing and returns the stored tree as-is.
    pub fn update_program(
        &mut self,
        id: ProgramId,
        changes: &ProgramChangeSet,
    ) -> Result<Program, ApiError> {
        if changes.is_empty() {
            return Ok(self.store.load_program(id)?);
        }
        Ok(self.store.apply_program_changes(id, changes)?)
    }

    /// The full edit pipeline: load the stored tree, diff the edited draft
    /// against it, apply. Returns the canonical tree and the change-set
    /// that produced it.
    pub fn edit_program(
        &mut self,
        id: ProgramId,
        edited: ProgramDraft,
    ) -> Result<(Program, ProgramChangeSet), ApiError> {
        if edited.program_id.is_some_and(|draft_id| draft_id != id) {
            return Err(ApiError::BadRequest(
                "draft program id does not match the path".to_string(),
            ));
        }
        let original = self.store.load_program(id)?;
        edited.validate()?;
        let changes = diff_program(&original.to_draft(), &edited);
        if changes.is_empty() {
            return Ok((original, changes));
        }
        let program = self.store.apply_program_changes(id, &changes)?;
        Ok((program, changes))
    }

    pub fn delete_program(&mut self, id: ProgramId) -> Result<(), ApiError> {
        let owner = self.store.program_owner(id)?;
        self.store.delete_program(id)?;
        // Logged sessions that pointed at this program had their links
        // nulled; drop the cached copies and reload lazily.
        self.sessions.remove(&owner);
        Ok(())
    }

    // -------------------------------------------------------------------
    // Logged sessions
    // -------------------------------------------------------------------

    pub fn list_sessions(&mut self, user: UserId) -> Result<Vec<ExerciseSession>, ApiError> {
        if !self.sessions.contains_key(&user) {
            let loaded = self.store.list_sessions(user)?;
            self.sessions.insert(user, loaded);
        }
        Ok(self.sessions[&user].clone())
    }

    pub fn create_session(
        &mut self,
        user: UserId,
        unit: WeightUnit,
        draft: SessionDraft,
    ) -> Result<ExerciseSession, ApiError> {
        draft.validate()?;
        let session = self
            .store
            .create_session(user, &draft.into_new_session(unit))?;
        self.cache_insert(user, session.clone());
        Ok(session)
    }

    /// Applies a client-computed change-set. A no-op change-set touches
    /// nothing and returns the stored tree as-is.
    pub fn update_session(
        &mut self,
        id: SessionId,
        changes: &SessionChangeSet,
    ) -> Result<ExerciseSession, ApiError> {
        if changes.is_empty() {
            return Ok(self.store.load_session(id)?);
        }
        let session = self.store.apply_session_changes(id, changes)?;
        let owner = self.store.session_owner(id)?;
        self.cache_insert(owner, session.clone());
        Ok(session)
    }

    /// The full edit pipeline for a logged session. `unit` is the display
    /// unit the draft's weights are in.
    pub fn edit_session(
        &mut self,
        id: SessionId,
        unit: WeightUnit,
        edited: SessionDraft,
    ) -> Result<(ExerciseSession, SessionChangeSet), ApiError> {
        if edited.sid.is_some_and(|draft_id| draft_id != id) {
            return Err(ApiError::BadRequest(
                "draft session id does not match the path".to_string(),
            ));
        }
        let original = self.store.load_session(id)?;
        edited.validate()?;
        let changes = diff_session(&original, &edited, unit)?;
        if changes.is_empty() {
            return Ok((original, changes));
        }
        let session = self.store.apply_session_changes(id, &changes)?;
        let owner = self.store.session_owner(id)?;
        self.cache_insert(owner, session.clone());
        Ok((session, changes))
    }

    pub fn delete_session(&mut self, id: SessionId) -> Result<(), ApiError> {
        let owner = self.store.session_owner(id)?;
        self.store.delete_session(id)?;
        if let Some(list) = self.sessions.get_mut(&owner) {
            list.retain(|s| s.sid != id);
        }
        Ok(())
    }

    fn cache_insert(&mut self, user: UserId, session: ExerciseSession) {
        if let Some(list) = self.sessions.get_mut(&user) {
            insert_and_resort(list, session);
        }
    }

    // -------------------------------------------------------------------
    // Current program and schedule
    // -------------------------------------------------------------------

    pub fn current_program(&self, user: UserId) -> Result<Option<CurrentProgram>, ApiError> {
        Ok(self.store.current_program(user)?)
    }

    pub fn set_current_program(
        &mut self,
        user: UserId,
        program: ProgramId,
        start_date: NaiveDate,
    ) -> Result<CurrentProgram, ApiError> {
        self.store.set_current_program(user, program, start_date)?;
        self.store
            .current_program(user)?
            .ok_or_else(|| ApiError::InternalError("current program vanished".to_string()))
    }

    /// Which split day today is, and the session assigned to it, for the
    /// user's active program.
    pub fn schedule_today(&self, user: UserId) -> Result<(NaiveDate, SplitDay), ApiError> {
        let (program, start_date) = self.active_program(user)?;
        let today = Utc::now().date_naive();
        Ok((today, current_split_day(&program, start_date, today)))
    }

    /// All training dates in the next `days` days for the user's active
    /// program.
    pub fn schedule_upcoming(&self, user: UserId, days: u32) -> Result<Vec<NaiveDate>, ApiError> {
        let (program, start_date) = self.active_program(user)?;
        let today = Utc::now().date_naive();
        Ok(future_session_dates(&program, start_date, today, days))
    }

    fn active_program(&self, user: UserId) -> Result<(Program, NaiveDate), ApiError> {
        let current = self
            .store
            .current_program(user)?
            .ok_or_else(|| ApiError::NotFound("no current program set".to_string()))?;
        let program = self.store.load_program(current.program_id)?;
        Ok((program, current.start_date))
    }
}
