//! The session diff engine.
//!
//! Compares a persisted workout log against an edited draft and emits a
//! [`SessionChangeSet`]. Exercises are matched by id when the draft carries
//! one, falling back to name only for drafts without ids (so renaming a
//! persisted exercise is an update, not a delete plus re-create that would
//! orphan its set history).
//!
//! Within one exercise, sets are ordered by set number and the only
//! supported edit shapes are appending to or removing from the tail, so the
//! set sub-diff is positional: the overlapping prefix is compared per
//! position and the surplus side becomes deletions or additions. Removing a
//! set from the middle is attributed to the tail; this keeps the diff
//! linear.
//!
//! Weights arrive in the client's display unit and are converted to
//! kilograms here, at the boundary. Change detection compares in display
//! space (stored kg converted out, against the draft value as entered):
//! the lb/kg factors are not exact inverses, so a kg-space comparison
//! would flag every weight on an untouched pounds form as changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::{HashMap, HashSet};

use crate::diff::non_empty;
use crate::error::CoreError;
use crate::id::{ExerciseId, ProgramId, ProgramSessionId, SetId};
use crate::session::{Exercise, ExerciseDraft, ExerciseSession, NewExercise, NewSet, SessionDraft};
use crate::units::{round2, WeightUnit};

/// Everything that must change to bring a stored session in line with an
/// edited draft. `None` means no operation of that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionChangeSet {
    pub date: Option<DateTime<Utc>>,
    /// Program link, emitted as a pair or not at all.
    pub program_id: Option<ProgramId>,
    pub program_session_id: Option<ProgramSessionId>,
    pub exercises_to_delete: Option<Vec<ExerciseId>>,
    pub exercises_to_add: Option<Vec<NewExercise>>,
    pub exercises_to_update: Option<Vec<ExerciseUpdate>>,
}

/// All changes to one retained exercise, batched into a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseUpdate {
    pub id: ExerciseId,
    pub name: Option<String>,
    pub sets_to_delete: Option<Vec<SetId>>,
    pub sets_to_add: Option<Vec<NewSet>>,
    pub sets_to_update: Option<Vec<SetUpdate>>,
}

/// Per-field update of one retained set. A field is `Some` when it changed;
/// 0 is a legitimate value and never means "unchanged".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetUpdate {
    pub id: SetId,
    pub reps: Option<u32>,
    /// New weight in kilograms.
    pub weight: Option<f64>,
}

impl SessionChangeSet {
    /// True when the edit was a no-op.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.program_id.is_none()
            && self.program_session_id.is_none()
            && self.exercises_to_delete.is_none()
            && self.exercises_to_add.is_none()
            && self.exercises_to_update.is_none()
    }
}

/// Computes the change-set between a stored session and an edited draft
/// whose weights are in `unit`.
pub fn diff_session(
    original: &ExerciseSession,
    edited: &SessionDraft,
    unit: WeightUnit,
) -> Result<SessionChangeSet, CoreError> {
    // Linking a session to half a program reference is not a valid
    // transition; refuse before emitting anything.
    if edited.program_id.is_some() != edited.program_session_id.is_some() {
        return Err(CoreError::ProgramLinkIncomplete);
    }

    let date = (original.date != edited.date).then_some(edited.date);

    let (program_id, program_session_id) = match (edited.program_id, edited.program_session_id) {
        (Some(pid), Some(psid))
            if (Some(pid), Some(psid)) != (original.program_id, original.program_session_id) =>
        {
            (Some(pid), Some(psid))
        }
        _ => (None, None),
    };

    let by_id: HashMap<ExerciseId, &Exercise> =
        original.exercises.iter().map(|ex| (ex.id, ex)).collect();
    let by_name: HashMap<&str, &Exercise> = original
        .exercises
        .iter()
        .map(|ex| (ex.name.as_str(), ex))
        .collect();

    let mut matched: HashSet<ExerciseId> = HashSet::new();
    let mut exercises_to_add = Vec::new();
    let mut exercises_to_update = Vec::new();
    for ex in &edited.exercises {
        let target = match ex.id {
            Some(id) => {
                Some(*by_id.get(&id).ok_or(CoreError::UnknownExerciseId { id })?)
            }
            // Name fallback for drafts without ids, skipping originals a
            // previous draft entry already claimed.
            None => by_name
                .get(ex.name.as_str())
                .copied()
                .filter(|orig| !matched.contains(&orig.id)),
        };
        match target {
            Some(orig) => {
                matched.insert(orig.id);
                if let Some(update) = diff_exercise(orig, ex, unit) {
                    exercises_to_update.push(update);
                }
            }
            None => exercises_to_add.push(NewExercise {
                name: ex.name.clone(),
                sets: ex
                    .sets
                    .iter()
                    .map(|s| NewSet {
                        set_number: s.set_number,
                        reps: s.reps,
                        weight: unit.to_kg(s.weight),
                    })
                    .collect(),
            }),
        }
    }

    let exercises_to_delete: Vec<ExerciseId> = original
        .exercises
        .iter()
        .map(|ex| ex.id)
        .filter(|id| !matched.contains(id))
        .collect();

    Ok(SessionChangeSet {
        date,
        program_id,
        program_session_id,
        exercises_to_delete: non_empty(exercises_to_delete),
        exercises_to_add: non_empty(exercises_to_add),
        exercises_to_update: non_empty(exercises_to_update),
    })
}

/// Sub-diff of one retained exercise. Returns a record only when something
/// changed.
fn diff_exercise(
    original: &Exercise,
    edited: &ExerciseDraft,
    unit: WeightUnit,
) -> Option<ExerciseUpdate> {
    let name = (original.name != edited.name).then(|| edited.name.clone());

    let original_sets = &original.sets;
    let edited_sets = &edited.sets;

    // Positive: trailing originals removed. Negative: trailing edits added.
    let sets_to_delete = if original_sets.len() > edited_sets.len() {
        Some(
            original_sets[edited_sets.len()..]
                .iter()
                .map(|s| s.id)
                .collect(),
        )
    } else {
        None
    };
    let sets_to_add = if edited_sets.len() > original_sets.len() {
        Some(
            edited_sets[original_sets.len()..]
                .iter()
                .map(|s| NewSet {
                    set_number: s.set_number,
                    reps: s.reps,
                    weight: unit.to_kg(s.weight),
                })
                .collect(),
        )
    } else {
        None
    };

    let overlap = original_sets.len().min(edited_sets.len());
    let mut updates = Vec::new();
    for i in 0..overlap {
        let orig = &original_sets[i];
        let edit = &edited_sets[i];
        let reps = (orig.reps != edit.reps).then_some(edit.reps);
        let weight =
            (unit.to_display(round2(orig.weight)) != edit.weight).then(|| unit.to_kg(edit.weight));
        if reps.is_some() || weight.is_some() {
            updates.push(SetUpdate {
                id: orig.id,
                reps,
                weight,
            });
        }
    }
    let sets_to_update = non_empty(updates);

    let unchanged = name.is_none()
        && sets_to_delete.is_none()
        && sets_to_add.is_none()
        && sets_to_update.is_none();
    if unchanged {
        None
    } else {
        Some(ExerciseUpdate {
            id: original.id,
            name,
            sets_to_delete,
            sets_to_add,
            sets_to_update,
        })
    }
}
