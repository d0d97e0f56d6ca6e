//! Training program trees.
//!
//! Two shapes exist for every program:
//!
//! - The **canonical** tree ([`Program`]) is what storage returns: split
//!   indices nested under their session, superset slots flattened to
//!   `(set_index, exercise_index)` rows, every row carrying its id.
//! - The **draft** tree ([`ProgramDraft`]) is what an editor manipulates:
//!   split indices hoisted to program level and tagged with the array
//!   position of the session they belong to, slots grouped into supersets,
//!   ids optional (absent means "create me").
//!
//! [`Program::to_draft`] performs the load-time conversion and
//! [`ProgramDraft::into_new_program`] the create-flow conversion back to the
//! flat creation payload. The diff engine in [`crate::diff::program`]
//! compares two drafts.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{ProgramId, ProgramSessionId, ProgramSetId, SplitIndexId};

/// Longest allowed program, session, and exercise name.
const MAX_NAME_LEN: usize = 16;

/// Longest allowed split cycle, in days.
pub const MAX_SPLIT_LENGTH: u8 = 14;

// ---------------------------------------------------------------------------
// Canonical (persisted) shapes
// ---------------------------------------------------------------------------

/// A persisted training program: a repeating split of named sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub program_id: ProgramId,
    pub program_name: String,
    /// Cycle length in days, 1..=14.
    pub split_length: u8,
    pub program_sessions: Vec<ProgramSession>,
}

/// A session template within a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSession {
    pub id: ProgramSessionId,
    pub name: String,
    /// Days in the cycle this session occupies.
    pub split_indices: Vec<SplitIndex>,
    /// Flattened superset slots, ordered by `(set_index, exercise_index)`.
    pub program_sets: Vec<ProgramSet>,
}

/// A day-in-cycle assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndex {
    pub id: SplitIndexId,
    /// 0-based day within the cycle.
    pub index: u8,
}

/// One superset slot: `set_index` addresses the superset group,
/// `exercise_index` the position within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSet {
    pub id: ProgramSetId,
    pub set_index: u16,
    pub exercise_index: u16,
    pub exercise_name: String,
}

// ---------------------------------------------------------------------------
// Draft (editor) shapes
// ---------------------------------------------------------------------------

/// An editable program tree. Ids are optional: absent means the entity has
/// never been persisted and must be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDraft {
    pub program_id: Option<ProgramId>,
    pub program_name: String,
    pub split_length: u8,
    /// All day assignments, hoisted to program level. `session_index` is the
    /// array position of the owning session in `program_sessions`, which is
    /// how an assignment can point at a session that has no id yet.
    pub split_indices: Vec<SplitIndexDraft>,
    pub program_sessions: Vec<ProgramSessionDraft>,
}

/// A day assignment under edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndexDraft {
    pub split_id: Option<SplitIndexId>,
    pub split_index: u8,
    pub session_index: usize,
}

/// A session template under edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSessionDraft {
    pub sess_id: Option<ProgramSessionId>,
    pub name: String,
    pub program_sets: Vec<SupersetDraft>,
}

/// One superset group under edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupersetDraft {
    pub sets: Vec<SlotDraft>,
}

/// One exercise slot under edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDraft {
    pub set_id: Option<ProgramSetId>,
    pub exercise_name: String,
}

// ---------------------------------------------------------------------------
// Creation payloads (no ids anywhere)
// ---------------------------------------------------------------------------

/// The full-tree creation payload for a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgram {
    pub program_name: String,
    pub split_length: u8,
    pub program_sessions: Vec<NewProgramSession>,
}

/// A session to create, carrying its own day assignments. Also used by the
/// program change-set for sessions added during an edit: their assignments
/// travel here because the session id they will reference does not exist
/// until the storage layer creates the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgramSession {
    pub name: String,
    pub split_indices: Vec<u8>,
    pub program_sets: Vec<NewProgramSet>,
}

/// A superset slot to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgramSet {
    pub set_index: u16,
    pub exercise_index: u16,
    pub exercise_name: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl Program {
    /// Converts the canonical tree into the editable shape: hoists each
    /// session's day assignments to program level tagged with the session's
    /// array position, and groups the flat slot rows into supersets.
    pub fn to_draft(&self) -> ProgramDraft {
        let split_indices = self
            .program_sessions
            .iter()
            .enumerate()
            .flat_map(|(session_index, sess)| {
                sess.split_indices.iter().map(move |si| SplitIndexDraft {
                    split_id: Some(si.id),
                    split_index: si.index,
                    session_index,
                })
            })
            .collect();

        let program_sessions = self
            .program_sessions
            .iter()
            .map(|sess| {
                let mut rows: Vec<&ProgramSet> = sess.program_sets.iter().collect();
                rows.sort_by_key(|s| (s.set_index, s.exercise_index));
                let mut supersets: Vec<SupersetDraft> = Vec::new();
                for row in rows {
                    while supersets.len() <= row.set_index as usize {
                        supersets.push(SupersetDraft { sets: Vec::new() });
                    }
                    supersets[row.set_index as usize].sets.push(SlotDraft {
                        set_id: Some(row.id),
                        exercise_name: row.exercise_name.clone(),
                    });
                }
                ProgramSessionDraft {
                    sess_id: Some(sess.id),
                    name: sess.name.clone(),
                    program_sets: supersets,
                }
            })
            .collect();

        ProgramDraft {
            program_id: Some(self.program_id),
            program_name: self.program_name.clone(),
            split_length: self.split_length,
            split_indices,
            program_sessions,
        }
    }
}

impl ProgramSessionDraft {
    /// Flattens the superset groups back to creation rows, recomputing each
    /// slot's `(set_index, exercise_index)` tag from its position in the
    /// edited arrays.
    pub fn flattened_sets(&self) -> Vec<NewProgramSet> {
        self.program_sets
            .iter()
            .enumerate()
            .flat_map(|(set_index, superset)| {
                superset
                    .sets
                    .iter()
                    .enumerate()
                    .map(move |(exercise_index, slot)| NewProgramSet {
                        set_index: set_index as u16,
                        exercise_index: exercise_index as u16,
                        exercise_name: slot.exercise_name.clone(),
                    })
            })
            .collect()
    }
}

impl ProgramDraft {
    /// Converts an id-less draft into the creation payload, grouping the
    /// hoisted day assignments back under their sessions.
    pub fn into_new_program(self) -> NewProgram {
        let split_indices = self.split_indices;
        let program_sessions = self
            .program_sessions
            .iter()
            .enumerate()
            .map(|(session_index, sess)| NewProgramSession {
                name: sess.name.clone(),
                split_indices: split_indices
                    .iter()
                    .filter(|si| si.session_index == session_index)
                    .map(|si| si.split_index)
                    .collect(),
                program_sets: sess.flattened_sets(),
            })
            .collect();

        NewProgram {
            program_name: self.program_name,
            split_length: self.split_length,
            program_sessions,
        }
    }

    /// Checks every structural invariant of an edited program tree.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name("program name", &self.program_name)?;
        validate_split_length(self.split_length)?;
        if self.program_sessions.is_empty() {
            return Err(CoreError::EmptyList {
                what: "program sessions",
            });
        }
        if self.split_indices.is_empty() {
            return Err(CoreError::EmptyList {
                what: "split indices",
            });
        }
        let mut seen = HashSet::new();
        for si in &self.split_indices {
            validate_split_index(si.split_index, self.split_length)?;
            if !seen.insert(si.split_index) {
                return Err(CoreError::DuplicateSplitIndex {
                    value: si.split_index,
                });
            }
            if si.session_index >= self.program_sessions.len() {
                return Err(CoreError::SessionIndexOutOfBounds {
                    value: si.session_index,
                    sessions: self.program_sessions.len(),
                });
            }
        }
        for sess in &self.program_sessions {
            validate_name("session name", &sess.name)?;
            if sess.program_sets.is_empty() {
                return Err(CoreError::EmptyList {
                    what: "program sets",
                });
            }
            for superset in &sess.program_sets {
                if superset.sets.is_empty() {
                    return Err(CoreError::EmptyList {
                        what: "superset slots",
                    });
                }
                for slot in &superset.sets {
                    validate_name("exercise name", &slot.exercise_name)?;
                }
            }
        }
        Ok(())
    }
}

impl NewProgram {
    /// Checks the creation payload's invariants. Same rules as draft
    /// validation, over the flat shape.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name("program name", &self.program_name)?;
        validate_split_length(self.split_length)?;
        if self.program_sessions.is_empty() {
            return Err(CoreError::EmptyList {
                what: "program sessions",
            });
        }
        let mut seen = HashSet::new();
        for sess in &self.program_sessions {
            validate_name("session name", &sess.name)?;
            if sess.program_sets.is_empty() {
                return Err(CoreError::EmptyList {
                    what: "program sets",
                });
            }
            for si in &sess.split_indices {
                validate_split_index(*si, self.split_length)?;
                if !seen.insert(*si) {
                    return Err(CoreError::DuplicateSplitIndex { value: *si });
                }
            }
            for set in &sess.program_sets {
                validate_name("exercise name", &set.exercise_name)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_name(what: &'static str, name: &str) -> Result<(), CoreError> {
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::InvalidName {
            what,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn validate_split_length(value: u8) -> Result<(), CoreError> {
    if value == 0 || value > MAX_SPLIT_LENGTH {
        return Err(CoreError::SplitLengthOutOfRange { value });
    }
    Ok(())
}

fn validate_split_index(value: u8, split_length: u8) -> Result<(), CoreError> {
    if value >= split_length {
        return Err(CoreError::SplitIndexOutOfRange {
            value,
            split_length,
        });
    }
    Ok(())
}
