//! SQLite implementation of [`WorkoutStore`].
//!
//! Every write operation is wrapped in a transaction. Change-set
//! application follows the operation order the engines assume: program
//! scalars, session deletes, session creates (the created session's day
//! assignments resolve against its fresh id), day-assignment
//! deletes/adds/updates, then per-session slot reconciliation. After the
//! commit the canonical tree is re-read and returned.
//!
//! Dates are stored as fixed-width RFC 3339 TEXT (UTC, millisecond
//! precision) so lexicographic ordering matches chronological ordering.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use rusqlite_migration::{Migrations, M};

use liftlog_core::diff::program::ProgramChangeSet;
use liftlog_core::diff::session::SessionChangeSet;
use liftlog_core::id::{
    ExerciseId, ProgramId, ProgramSessionId, ProgramSetId, SessionId, SetId, SplitIndexId,
};
use liftlog_core::program::{NewProgram, NewProgramSession, Program, ProgramSession, ProgramSet, SplitIndex};
use liftlog_core::session::{Exercise, ExerciseSession, NewExercise, NewSession, SetEntry};

use crate::error::StorageError;
use crate::traits::WorkoutStore;
use crate::types::{CurrentProgram, UserId};

/// SQLite-backed implementation of [`WorkoutStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`, with pragmas set and
    /// all pending migrations applied.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let mut conn = Connection::open(path)?;
        Self::prepare(&mut conn)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let mut conn = Connection::open_in_memory()?;
        Self::prepare(&mut conn)?;
        Ok(SqliteStore { conn })
    }

    /// Pragmas and schema migrations every connection gets before use.
    ///
    /// Foreign key enforcement is off by default in SQLite, and the store
    /// depends on it: deleting a program session must take its slot and
    /// day-assignment rows with it, and deleting a program must null the
    /// program links on logged sessions rather than orphan them. Migrations
    /// are tracked through the `user_version` pragma and embedded at
    /// compile time.
    fn prepare(conn: &mut Connection) -> Result<(), StorageError> {
        // WAL for concurrent reads + single writer performance; NORMAL
        // synchronous is safe under WAL.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Migrations::new(vec![M::up(include_str!(
            "migrations/001_initial_schema.sql"
        ))])
        .to_latest(conn)
        .map_err(|e| StorageError::Migration(e.to_string()))?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn assert_user_exists(&self, user: UserId) -> Result<(), StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
            params![user.0],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StorageError::UserNotFound(user.0));
        }
        Ok(())
    }

    fn assert_program_exists(&self, id: ProgramId) -> Result<(), StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM programs WHERE id = ?1)",
            params![id.0],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StorageError::ProgramNotFound(id.0));
        }
        Ok(())
    }

    fn assert_session_exists(&self, id: SessionId) -> Result<(), StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM exercise_sessions WHERE id = ?1)",
            params![id.0],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StorageError::SessionNotFound(id.0));
        }
        Ok(())
    }
}

/// Encodes a timestamp as fixed-width RFC 3339 UTC text.
fn encode_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_datetime(text: &str) -> Result<DateTime<Utc>, StorageError> {
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}

fn decode_date(text: &str) -> Result<NaiveDate, StorageError> {
    Ok(text.parse::<NaiveDate>()?)
}

/// Inserts one session tree under `program_id`, resolving the session's
/// day assignments against the freshly created session id.
fn insert_session_tree(
    tx: &Transaction<'_>,
    program_id: i64,
    sess: &NewProgramSession,
) -> Result<i64, StorageError> {
    tx.execute(
        "INSERT INTO program_sessions (program_id, name) VALUES (?1, ?2)",
        params![program_id, sess.name],
    )?;
    let session_id = tx.last_insert_rowid();
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO split_indices (program_id, program_session_id, day_index)
             VALUES (?1, ?2, ?3)",
        )?;
        for index in &sess.split_indices {
            stmt.execute(params![program_id, session_id, i64::from(*index)])?;
        }
    }
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO program_sets (program_session_id, set_index, exercise_index, exercise_name)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for set in &sess.program_sets {
            stmt.execute(params![
                session_id,
                i64::from(set.set_index),
                i64::from(set.exercise_index),
                set.exercise_name,
            ])?;
        }
    }
    Ok(session_id)
}

/// Inserts one exercise tree under a logged session.
fn insert_exercise_tree(
    tx: &Transaction<'_>,
    session_id: i64,
    exercise: &NewExercise,
) -> Result<i64, StorageError> {
    tx.execute(
        "INSERT INTO exercises (session_id, name) VALUES (?1, ?2)",
        params![session_id, exercise.name],
    )?;
    let exercise_id = tx.last_insert_rowid();
    let mut stmt = tx.prepare_cached(
        "INSERT INTO exercise_sets (exercise_id, set_number, reps, weight_kg)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for set in &exercise.sets {
        stmt.execute(params![
            exercise_id,
            i64::from(set.set_number),
            i64::from(set.reps),
            set.weight,
        ])?;
    }
    Ok(exercise_id)
}

impl WorkoutStore for SqliteStore {
    // -------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------

    fn create_user(&mut self, name: &str) -> Result<UserId, StorageError> {
        self.conn
            .execute("INSERT INTO users (name) VALUES (?1)", params![name])?;
        Ok(UserId(self.conn.last_insert_rowid()))
    }

    fn user_exists(&self, user: UserId) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
            params![user.0],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    // -------------------------------------------------------------------
    // Programs
    // -------------------------------------------------------------------

    fn create_program(
        &mut self,
        user: UserId,
        program: &NewProgram,
    ) -> Result<Program, StorageError> {
        self.assert_user_exists(user)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO programs (user_id, name, split_length) VALUES (?1, ?2, ?3)",
            params![user.0, program.program_name, i64::from(program.split_length)],
        )?;
        let program_id = tx.last_insert_rowid();
        for sess in &program.program_sessions {
            insert_session_tree(&tx, program_id, sess)?;
        }
        tx.commit()?;
        self.load_program(ProgramId(program_id))
    }

    fn load_program(&self, id: ProgramId) -> Result<Program, StorageError> {
        let header: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT name, split_length FROM programs WHERE id = ?1",
                params![id.0],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (program_name, split_length) =
            header.ok_or(StorageError::ProgramNotFound(id.0))?;

        let session_rows: Vec<(i64, String)> = {
            let mut stmt = self.conn.prepare_cached(
                "SELECT id, name FROM program_sessions WHERE program_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map(params![id.0], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<_, _>>()?;
            rows
        };

        let mut program_sessions = Vec::with_capacity(session_rows.len());
        for (sess_id, name) in session_rows {
            let split_indices: Vec<SplitIndex> = {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, day_index FROM split_indices
                     WHERE program_session_id = ?1 ORDER BY day_index",
                )?;
                let rows = stmt
                    .query_map(params![sess_id], |row| {
                        Ok(SplitIndex {
                            id: SplitIndexId(row.get(0)?),
                            index: row.get::<_, i64>(1)? as u8,
                        })
                    })?
                    .collect::<Result<_, _>>()?;
                rows
            };
            let program_sets: Vec<ProgramSet> = {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, set_index, exercise_index, exercise_name FROM program_sets
                     WHERE program_session_id = ?1 ORDER BY set_index, exercise_index",
                )?;
                let rows = stmt
                    .query_map(params![sess_id], |row| {
                        Ok(ProgramSet {
                            id: ProgramSetId(row.get(0)?),
                            set_index: row.get::<_, i64>(1)? as u16,
                            exercise_index: row.get::<_, i64>(2)? as u16,
                            exercise_name: row.get(3)?,
                        })
                    })?
                    .collect::<Result<_, _>>()?;
                rows
            };
            program_sessions.push(ProgramSession {
                id: ProgramSessionId(sess_id),
                name,
                split_indices,
                program_sets,
            });
        }

        Ok(Program {
            program_id: id,
            program_name,
            split_length: split_length as u8,
            program_sessions,
        })
    }

    fn list_programs(&self, user: UserId) -> Result<Vec<Program>, StorageError> {
        self.assert_user_exists(user)?;
        let ids: Vec<i64> = {
            let mut stmt = self
                .conn
                .prepare_cached("SELECT id FROM programs WHERE user_id = ?1 ORDER BY id")?;
            let rows = stmt
                .query_map(params![user.0], |row| row.get(0))?
                .collect::<Result<_, _>>()?;
            rows
        };
        ids.into_iter()
            .map(|id| self.load_program(ProgramId(id)))
            .collect()
    }

    fn apply_program_changes(
        &mut self,
        id: ProgramId,
        changes: &ProgramChangeSet,
    ) -> Result<Program, StorageError> {
        self.assert_program_exists(id)?;
        let tx = self.conn.transaction()?;

        if let Some(name) = &changes.program_name {
            tx.execute(
                "UPDATE programs SET name = ?1 WHERE id = ?2",
                params![name, id.0],
            )?;
        }
        if let Some(split_length) = changes.split_length {
            tx.execute(
                "UPDATE programs SET split_length = ?1 WHERE id = ?2",
                params![i64::from(split_length), id.0],
            )?;
        }

        if let Some(session_ids) = &changes.sessions_to_delete {
            let mut stmt = tx.prepare_cached(
                "DELETE FROM program_sessions WHERE id = ?1 AND program_id = ?2",
            )?;
            for sess_id in session_ids {
                stmt.execute(params![sess_id.0, id.0])?;
            }
        }
        if let Some(sessions) = &changes.sessions_to_add {
            for sess in sessions {
                insert_session_tree(&tx, id.0, sess)?;
            }
        }

        if let Some(index_ids) = &changes.indices_to_delete {
            let mut stmt = tx
                .prepare_cached("DELETE FROM split_indices WHERE id = ?1 AND program_id = ?2")?;
            for index_id in index_ids {
                stmt.execute(params![index_id.0, id.0])?;
            }
        }
        if let Some(adds) = &changes.indices_to_add {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO split_indices (program_id, program_session_id, day_index)
                 VALUES (?1, ?2, ?3)",
            )?;
            for add in adds {
                stmt.execute(params![id.0, add.session_id.0, i64::from(add.index)])?;
            }
        }
        if let Some(updates) = &changes.indices_to_update {
            let mut stmt = tx.prepare_cached(
                "UPDATE split_indices SET day_index = ?1 WHERE id = ?2 AND program_id = ?3",
            )?;
            for update in updates {
                stmt.execute(params![i64::from(update.index), update.index_id.0, id.0])?;
            }
        }

        if let Some(session_updates) = &changes.sessions_to_update {
            for update in session_updates {
                let sess_id = update.program_session_id.0;
                if let Some(name) = &update.name {
                    tx.execute(
                        "UPDATE program_sessions SET name = ?1 WHERE id = ?2 AND program_id = ?3",
                        params![name, sess_id, id.0],
                    )?;
                }
                if let Some(slot_ids) = &update.exercises_to_delete {
                    let mut stmt = tx.prepare_cached(
                        "DELETE FROM program_sets WHERE id = ?1 AND program_session_id = ?2",
                    )?;
                    for slot_id in slot_ids {
                        stmt.execute(params![slot_id.0, sess_id])?;
                    }
                }
                if let Some(slots) = &update.exercises_to_add {
                    let mut stmt = tx.prepare_cached(
                        "INSERT INTO program_sets
                         (program_session_id, set_index, exercise_index, exercise_name)
                         VALUES (?1, ?2, ?3, ?4)",
                    )?;
                    for slot in slots {
                        stmt.execute(params![
                            sess_id,
                            i64::from(slot.set_index),
                            i64::from(slot.exercise_index),
                            slot.exercise_name,
                        ])?;
                    }
                }
                if let Some(slots) = &update.exercises_to_update {
                    let mut stmt = tx.prepare_cached(
                        "UPDATE program_sets
                         SET set_index = ?1, exercise_index = ?2, exercise_name = ?3
                         WHERE id = ?4 AND program_session_id = ?5",
                    )?;
                    for slot in slots {
                        stmt.execute(params![
                            i64::from(slot.set_index),
                            i64::from(slot.exercise_index),
                            slot.exercise_name,
                            slot.id.0,
                            sess_id,
                        ])?;
                    }
                }
            }
        }

        tx.commit()?;
        self.load_program(id)
    }

    fn delete_program(&mut self, id: ProgramId) -> Result<(), StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM programs WHERE id = ?1", params![id.0])?;
        if deleted == 0 {
            return Err(StorageError::ProgramNotFound(id.0));
        }
        Ok(())
    }

    fn program_owner(&self, id: ProgramId) -> Result<UserId, StorageError> {
        let owner: Option<i64> = self
            .conn
            .query_row(
                "SELECT user_id FROM programs WHERE id = ?1",
                params![id.0],
                |row| row.get(0),
            )
            .optional()?;
        owner
            .map(UserId)
            .ok_or(StorageError::ProgramNotFound(id.0))
    }

    // -------------------------------------------------------------------
    // Logged sessions
    // -------------------------------------------------------------------

    fn create_session(
        &mut self,
        user: UserId,
        session: &NewSession,
    ) -> Result<ExerciseSession, StorageError> {
        self.assert_user_exists(user)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO exercise_sessions (user_id, date, program_id, program_session_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user.0,
                encode_datetime(&session.date),
                session.program_id.map(|p| p.0),
                session.program_session_id.map(|p| p.0),
            ],
        )?;
        let session_id = tx.last_insert_rowid();
        for exercise in &session.exercises {
            insert_exercise_tree(&tx, session_id, exercise)?;
        }
        tx.commit()?;
        self.load_session(SessionId(session_id))
    }

    fn load_session(&self, id: SessionId) -> Result<ExerciseSession, StorageError> {
        let header: Option<(String, Option<i64>, Option<i64>)> = self
            .conn
            .query_row(
                "SELECT date, program_id, program_session_id
                 FROM exercise_sessions WHERE id = ?1",
                params![id.0],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        let (date_text, program_id, program_session_id) =
            header.ok_or(StorageError::SessionNotFound(id.0))?;

        let exercise_rows: Vec<(i64, String)> = {
            let mut stmt = self
                .conn
                .prepare_cached("SELECT id, name FROM exercises WHERE session_id = ?1 ORDER BY id")?;
            let rows = stmt
                .query_map(params![id.0], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<_, _>>()?;
            rows
        };

        let mut exercises = Vec::with_capacity(exercise_rows.len());
        for (exercise_id, name) in exercise_rows {
            let sets: Vec<SetEntry> = {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, set_number, reps, weight_kg FROM exercise_sets
                     WHERE exercise_id = ?1 ORDER BY set_number, id",
                )?;
                let rows = stmt
                    .query_map(params![exercise_id], |row| {
                        Ok(SetEntry {
                            id: SetId(row.get(0)?),
                            set_number: row.get::<_, i64>(1)? as u32,
                            reps: row.get::<_, i64>(2)? as u32,
                            weight: row.get(3)?,
                        })
                    })?
                    .collect::<Result<_, _>>()?;
                rows
            };
            exercises.push(Exercise {
                id: ExerciseId(exercise_id),
                name,
                sets,
            });
        }

        Ok(ExerciseSession {
            sid: id,
            date: decode_datetime(&date_text)?,
            program_id: program_id.map(ProgramId),
            program_session_id: program_session_id.map(ProgramSessionId),
            exercises,
        })
    }

    fn list_sessions(&self, user: UserId) -> Result<Vec<ExerciseSession>, StorageError> {
        self.assert_user_exists(user)?;
        let ids: Vec<i64> = {
            let mut stmt = self.conn.prepare_cached(
                "SELECT id FROM exercise_sessions WHERE user_id = ?1 ORDER BY date DESC, id DESC",
            )?;
            let rows = stmt
                .query_map(params![user.0], |row| row.get(0))?
                .collect::<Result<_, _>>()?;
            rows
        };
        ids.into_iter()
            .map(|id| self.load_session(SessionId(id)))
            .collect()
    }

    fn apply_session_changes(
        &mut self,
        id: SessionId,
        changes: &SessionChangeSet,
    ) -> Result<ExerciseSession, StorageError> {
        self.assert_session_exists(id)?;
        let tx = self.conn.transaction()?;

        if let Some(date) = &changes.date {
            tx.execute(
                "UPDATE exercise_sessions SET date = ?1 WHERE id = ?2",
                params![encode_datetime(date), id.0],
            )?;
        }
        // The engine emits the program link as a pair or not at all.
        if let (Some(program_id), Some(program_session_id)) =
            (changes.program_id, changes.program_session_id)
        {
            tx.execute(
                "UPDATE exercise_sessions SET program_id = ?1, program_session_id = ?2
                 WHERE id = ?3",
                params![program_id.0, program_session_id.0, id.0],
            )?;
        }

        if let Some(exercise_ids) = &changes.exercises_to_delete {
            let mut stmt = tx
                .prepare_cached("DELETE FROM exercises WHERE id = ?1 AND session_id = ?2")?;
            for exercise_id in exercise_ids {
                stmt.execute(params![exercise_id.0, id.0])?;
            }
        }
        if let Some(exercises) = &changes.exercises_to_add {
            for exercise in exercises {
                insert_exercise_tree(&tx, id.0, exercise)?;
            }
        }
        if let Some(updates) = &changes.exercises_to_update {
            for update in updates {
                let exercise_id = update.id.0;
                if let Some(name) = &update.name {
                    tx.execute(
                        "UPDATE exercises SET name = ?1 WHERE id = ?2 AND session_id = ?3",
                        params![name, exercise_id, id.0],
                    )?;
                }
                if let Some(set_ids) = &update.sets_to_delete {
                    let mut stmt = tx.prepare_cached(
                        "DELETE FROM exercise_sets WHERE id = ?1 AND exercise_id = ?2",
                    )?;
                    for set_id in set_ids {
                        stmt.execute(params![set_id.0, exercise_id])?;
                    }
                }
                if let Some(sets) = &update.sets_to_add {
                    let mut stmt = tx.prepare_cached(
                        "INSERT INTO exercise_sets (exercise_id, set_number, reps, weight_kg)
                         VALUES (?1, ?2, ?3, ?4)",
                    )?;
                    for set in sets {
                        stmt.execute(params![
                            exercise_id,
                            i64::from(set.set_number),
                            i64::from(set.reps),
                            set.weight,
                        ])?;
                    }
                }
                if let Some(set_updates) = &update.sets_to_update {
                    // COALESCE keeps the stored value for fields the engine
                    // left unchanged; 0 binds as 0, never as "keep".
                    let mut stmt = tx.prepare_cached(
                        "UPDATE exercise_sets
                         SET reps = COALESCE(?1, reps), weight_kg = COALESCE(?2, weight_kg)
                         WHERE id = ?3 AND exercise_id = ?4",
                    )?;
                    for set_update in set_updates {
                        stmt.execute(params![
                            set_update.reps.map(i64::from),
                            set_update.weight,
                            set_update.id.0,
                            exercise_id,
                        ])?;
                    }
                }
            }
        }

        tx.commit()?;
        self.load_session(id)
    }

    fn delete_session(&mut self, id: SessionId) -> Result<(), StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM exercise_sessions WHERE id = ?1", params![id.0])?;
        if deleted == 0 {
            return Err(StorageError::SessionNotFound(id.0));
        }
        Ok(())
    }

    fn session_owner(&self, id: SessionId) -> Result<UserId, StorageError> {
        let owner: Option<i64> = self
            .conn
            .query_row(
                "SELECT user_id FROM exercise_sessions WHERE id = ?1",
                params![id.0],
                |row| row.get(0),
            )
            .optional()?;
        owner
            .map(UserId)
            .ok_or(StorageError::SessionNotFound(id.0))
    }

    // -------------------------------------------------------------------
    // Current program
    // -------------------------------------------------------------------

    fn set_current_program(
        &mut self,
        user: UserId,
        program: ProgramId,
        start_date: NaiveDate,
    ) -> Result<(), StorageError> {
        self.assert_user_exists(user)?;
        let owner = self.program_owner(program)?;
        if owner != user {
            return Err(StorageError::IntegrityError {
                reason: format!("program {} does not belong to user {}", program.0, user.0),
            });
        }
        self.conn.execute(
            "INSERT INTO current_programs (user_id, program_id, start_date)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                 program_id = excluded.program_id,
                 start_date = excluded.start_date",
            params![user.0, program.0, start_date.to_string()],
        )?;
        Ok(())
    }

    fn current_program(&self, user: UserId) -> Result<Option<CurrentProgram>, StorageError> {
        self.assert_user_exists(user)?;
        let row: Option<(i64, String, String)> = self
            .conn
            .query_row(
                "SELECT cp.program_id, p.name, cp.start_date
                 FROM current_programs cp
                 JOIN programs p ON p.id = cp.program_id
                 WHERE cp.user_id = ?1",
                params![user.0],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        row.map(|(program_id, program_name, start_date)| {
            Ok(CurrentProgram {
                program_id: ProgramId(program_id),
                program_name,
                start_date: decode_date(&start_date)?,
            })
        })
        .transpose()
    }
}
