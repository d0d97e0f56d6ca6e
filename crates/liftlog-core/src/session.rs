//! Logged exercise sessions.
//!
//! An [`ExerciseSession`] is one real-world workout, as opposed to a
//! [`crate::program::ProgramSession`] template. Weights are persisted in
//! kilograms; a [`SessionDraft`] carries weights in the client's display
//! unit and is converted at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{ExerciseId, ProgramId, ProgramSessionId, SessionId, SetId};
use crate::program::validate_name;
use crate::units::WeightUnit;

const MAX_SET_NUMBER: u32 = 10;
const MAX_REPS: u32 = 999;
const MAX_WEIGHT: f64 = 9999.0;

// ---------------------------------------------------------------------------
// Canonical (persisted) shapes
// ---------------------------------------------------------------------------

/// A persisted workout log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub sid: SessionId,
    pub date: DateTime<Utc>,
    /// Program this session followed, if any. Both link fields are set
    /// together or not at all.
    pub program_id: Option<ProgramId>,
    pub program_session_id: Option<ProgramSessionId>,
    pub exercises: Vec<Exercise>,
}

/// A logged exercise with its sets, ordered by set number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub sets: Vec<SetEntry>,
}

/// One logged set. `weight` is kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub id: SetId,
    pub set_number: u32,
    pub reps: u32,
    pub weight: f64,
}

// ---------------------------------------------------------------------------
// Draft (editor) shapes -- weights in the client's display unit
// ---------------------------------------------------------------------------

/// An editable workout log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub sid: Option<SessionId>,
    pub date: DateTime<Utc>,
    pub program_id: Option<ProgramId>,
    pub program_session_id: Option<ProgramSessionId>,
    pub exercises: Vec<ExerciseDraft>,
}

/// An exercise under edit. Absent id means "create me".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    pub id: Option<ExerciseId>,
    pub name: String,
    pub sets: Vec<SetDraft>,
}

/// A set under edit, weight in the display unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDraft {
    pub id: Option<SetId>,
    pub set_number: u32,
    pub reps: u32,
    pub weight: f64,
}

// ---------------------------------------------------------------------------
// Creation payloads (no ids, weights in kilograms)
// ---------------------------------------------------------------------------

/// The full-tree creation payload for a logged session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub date: DateTime<Utc>,
    pub program_id: Option<ProgramId>,
    pub program_session_id: Option<ProgramSessionId>,
    pub exercises: Vec<NewExercise>,
}

/// An exercise to create. Also used by the session change-set for exercises
/// added during an edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub sets: Vec<NewSet>,
}

/// A set to create, weight already converted to kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSet {
    pub set_number: u32,
    pub reps: u32,
    pub weight: f64,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl ExerciseSession {
    /// Converts the canonical tree into the editable shape, with stored
    /// kilogram weights converted to the given display unit.
    pub fn to_draft(&self, unit: WeightUnit) -> SessionDraft {
        SessionDraft {
            sid: Some(self.sid),
            date: self.date,
            program_id: self.program_id,
            program_session_id: self.program_session_id,
            exercises: self
                .exercises
                .iter()
                .map(|ex| ExerciseDraft {
                    id: Some(ex.id),
                    name: ex.name.clone(),
                    sets: ex
                        .sets
                        .iter()
                        .map(|s| SetDraft {
                            id: Some(s.id),
                            set_number: s.set_number,
                            reps: s.reps,
                            weight: unit.to_display(s.weight),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl SessionDraft {
    /// Converts an id-less draft into the creation payload, with weights
    /// converted back to kilograms.
    pub fn into_new_session(self, unit: WeightUnit) -> NewSession {
        NewSession {
            date: self.date,
            program_id: self.program_id,
            program_session_id: self.program_session_id,
            exercises: self
                .exercises
                .into_iter()
                .map(|ex| NewExercise {
                    name: ex.name,
                    sets: ex
                        .sets
                        .into_iter()
                        .map(|s| NewSet {
                            set_number: s.set_number,
                            reps: s.reps,
                            weight: unit.to_kg(s.weight),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Checks every structural invariant of an edited session tree.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.program_id.is_some() != self.program_session_id.is_some() {
            return Err(CoreError::ProgramLinkIncomplete);
        }
        if self.exercises.is_empty() {
            return Err(CoreError::EmptyList { what: "exercises" });
        }
        for ex in &self.exercises {
            validate_name("exercise name", &ex.name)?;
            if ex.sets.is_empty() {
                return Err(CoreError::EmptyList { what: "sets" });
            }
            for set in &ex.sets {
                if set.set_number == 0 || set.set_number > MAX_SET_NUMBER {
                    return Err(CoreError::SetNumberOutOfRange {
                        value: set.set_number,
                    });
                }
                if set.reps == 0 || set.reps > MAX_REPS {
                    return Err(CoreError::RepsOutOfRange { value: set.reps });
                }
                if set.weight < 0.0 || set.weight > MAX_WEIGHT {
                    return Err(CoreError::WeightOutOfRange { value: set.weight });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_session() -> ExerciseSession {
        ExerciseSession {
            sid: SessionId(1),
            date: Utc.with_ymd_and_hms(2024, 3, 4, 18, 30, 0).unwrap(),
            program_id: Some(ProgramId(2)),
            program_session_id: Some(ProgramSessionId(20)),
            exercises: vec![Exercise {
                id: ExerciseId(5),
                name: "squat".to_string(),
                sets: vec![SetEntry {
                    id: SetId(50),
                    set_number: 1,
                    reps: 5,
                    weight: 100.0,
                }],
            }],
        }
    }

    #[test]
    fn to_draft_converts_weight_for_pounds() {
        let draft = sample_session().to_draft(WeightUnit::Lb);
        assert_eq!(draft.exercises[0].sets[0].weight, 220.5);

        let kg_draft = sample_session().to_draft(WeightUnit::Kg);
        assert_eq!(kg_draft.exercises[0].sets[0].weight, 100.0);
    }

    #[test]
    fn into_new_session_converts_back_to_kg() {
        let new = sample_session()
            .to_draft(WeightUnit::Lb)
            .into_new_session(WeightUnit::Lb);
        assert!((new.exercises[0].sets[0].weight - 100.0).abs() < 0.01);
    }

    #[test]
    fn validate_rejects_half_set_program_link() {
        let mut draft = sample_session().to_draft(WeightUnit::Kg);
        draft.program_session_id = None;
        assert!(matches!(
            draft.validate(),
            Err(CoreError::ProgramLinkIncomplete)
        ));
    }

    #[test]
    fn validate_rejects_zero_reps() {
        let mut draft = sample_session().to_draft(WeightUnit::Kg);
        draft.exercises[0].sets[0].reps = 0;
        assert!(matches!(
            draft.validate(),
            Err(CoreError::RepsOutOfRange { value: 0 })
        ));
    }

    #[test]
    fn validate_accepts_zero_weight() {
        // Bodyweight movements log 0 kg; 0 is a value, not "unset".
        let mut draft = sample_session().to_draft(WeightUnit::Kg);
        draft.exercises[0].sets[0].weight = 0.0;
        assert!(draft.validate().is_ok());
    }
}
