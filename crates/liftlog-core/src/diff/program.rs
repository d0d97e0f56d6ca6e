//! The program diff engine.
//!
//! Compares the draft of a persisted program against the edited draft and
//! emits a [`ProgramChangeSet`]. Matching is strictly by id: sessions,
//! superset slots, and day assignments present in the original but missing
//! from the edit are deletions; entities without ids are creations; entities
//! present on both sides are compared field by field.
//!
//! Day assignments belonging to a brand-new session are never emitted
//! through `indices_to_add` -- the session id they must reference does not
//! exist yet, so they travel inside the session's creation payload and the
//! storage layer resolves them against the freshly created id.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::diff::non_empty;
use crate::id::{ProgramSessionId, ProgramSetId, SplitIndexId};
use crate::program::{NewProgramSession, NewProgramSet, ProgramDraft, ProgramSessionDraft};

/// Everything that must change to bring a stored program in line with an
/// edited draft. `None` means no operation of that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramChangeSet {
    pub program_name: Option<String>,
    pub split_length: Option<u8>,
    pub sessions_to_delete: Option<Vec<ProgramSessionId>>,
    pub sessions_to_add: Option<Vec<NewProgramSession>>,
    pub indices_to_delete: Option<Vec<SplitIndexId>>,
    pub indices_to_add: Option<Vec<SplitIndexAdd>>,
    pub indices_to_update: Option<Vec<SplitIndexUpdate>>,
    pub sessions_to_update: Option<Vec<ProgramSessionUpdate>>,
}

/// A day assignment to create for a session that already has an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndexAdd {
    pub session_id: ProgramSessionId,
    pub index: u8,
}

/// A day assignment whose day value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndexUpdate {
    pub index_id: SplitIndexId,
    pub index: u8,
}

/// All changes to one retained session, batched into a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSessionUpdate {
    pub program_session_id: ProgramSessionId,
    pub name: Option<String>,
    pub exercises_to_delete: Option<Vec<ProgramSetId>>,
    pub exercises_to_add: Option<Vec<NewProgramSet>>,
    pub exercises_to_update: Option<Vec<ProgramSetUpdate>>,
}

/// A retained slot whose name or position changed. Carries the full tag so
/// the storage layer writes all three columns in one update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSetUpdate {
    pub id: ProgramSetId,
    pub set_index: u16,
    pub exercise_index: u16,
    pub exercise_name: String,
}

impl ProgramChangeSet {
    /// True when the edit was a no-op: nothing to persist, the transport
    /// call can be skipped entirely.
    pub fn is_empty(&self) -> bool {
        self.program_name.is_none()
            && self.split_length.is_none()
            && self.sessions_to_delete.is_none()
            && self.sessions_to_add.is_none()
            && self.indices_to_delete.is_none()
            && self.indices_to_add.is_none()
            && self.indices_to_update.is_none()
            && self.sessions_to_update.is_none()
    }
}

/// A slot with its explicit position tag, the unit both sides of the
/// per-session sub-diff are flattened to before comparing.
struct TaggedSlot<'a> {
    set_id: Option<ProgramSetId>,
    set_index: u16,
    exercise_index: u16,
    exercise_name: &'a str,
}

fn tagged_slots(sess: &ProgramSessionDraft) -> Vec<TaggedSlot<'_>> {
    sess.program_sets
        .iter()
        .enumerate()
        .flat_map(|(set_index, superset)| {
            superset
                .sets
                .iter()
                .enumerate()
                .map(move |(exercise_index, slot)| TaggedSlot {
                    set_id: slot.set_id,
                    set_index: set_index as u16,
                    exercise_index: exercise_index as u16,
                    exercise_name: &slot.exercise_name,
                })
        })
        .collect()
}

/// Computes the change-set between the persisted program (as a draft) and
/// the edited draft.
pub fn diff_program(original: &ProgramDraft, edited: &ProgramDraft) -> ProgramChangeSet {
    let program_name =
        (original.program_name != edited.program_name).then(|| edited.program_name.clone());
    let split_length = (original.split_length != edited.split_length).then_some(edited.split_length);

    // Partition sessions: originals missing from the edit are deletions,
    // retained ids get a sub-diff, id-less edits are creations.
    let edited_session_ids: HashSet<ProgramSessionId> = edited
        .program_sessions
        .iter()
        .filter_map(|s| s.sess_id)
        .collect();
    let mut sessions_to_delete = Vec::new();
    let mut retained = Vec::new();
    for sess in &original.program_sessions {
        let Some(id) = sess.sess_id else { continue };
        if edited_session_ids.contains(&id) {
            retained.push(id);
        } else {
            sessions_to_delete.push(id);
        }
    }

    let mut sessions_to_add = Vec::new();
    for (session_index, sess) in edited.program_sessions.iter().enumerate() {
        if sess.sess_id.is_some() {
            continue;
        }
        sessions_to_add.push(NewProgramSession {
            name: sess.name.clone(),
            split_indices: edited
                .split_indices
                .iter()
                .filter(|si| si.session_index == session_index)
                .map(|si| si.split_index)
                .collect(),
            program_sets: sess.flattened_sets(),
        });
    }

    // Day assignments reconcile independently of sessions.
    let edited_split_ids: HashSet<SplitIndexId> = edited
        .split_indices
        .iter()
        .filter_map(|si| si.split_id)
        .collect();
    let indices_to_delete: Vec<SplitIndexId> = original
        .split_indices
        .iter()
        .filter_map(|si| si.split_id)
        .filter(|id| !edited_split_ids.contains(id))
        .collect();

    let original_index_by_id: HashMap<SplitIndexId, u8> = original
        .split_indices
        .iter()
        .filter_map(|si| si.split_id.map(|id| (id, si.split_index)))
        .collect();
    let mut indices_to_add = Vec::new();
    let mut indices_to_update = Vec::new();
    for si in &edited.split_indices {
        match si.split_id {
            None => {
                // Assignments owned by a new session travel with the
                // session's creation payload above, not here.
                if let Some(session_id) = edited
                    .program_sessions
                    .get(si.session_index)
                    .and_then(|s| s.sess_id)
                {
                    indices_to_add.push(SplitIndexAdd {
                        session_id,
                        index: si.split_index,
                    });
                }
            }
            Some(id) => {
                if original_index_by_id
                    .get(&id)
                    .is_some_and(|&orig| orig != si.split_index)
                {
                    indices_to_update.push(SplitIndexUpdate {
                        index_id: id,
                        index: si.split_index,
                    });
                }
            }
        }
    }

    let mut sessions_to_update = Vec::new();
    for sess_id in retained {
        let original_sess = original
            .program_sessions
            .iter()
            .find(|s| s.sess_id == Some(sess_id));
        let edited_sess = edited
            .program_sessions
            .iter()
            .find(|s| s.sess_id == Some(sess_id));
        if let (Some(original_sess), Some(edited_sess)) = (original_sess, edited_sess) {
            if let Some(update) = diff_session_template(original_sess, edited_sess, sess_id) {
                sessions_to_update.push(update);
            }
        }
    }

    ProgramChangeSet {
        program_name,
        split_length,
        sessions_to_delete: non_empty(sessions_to_delete),
        sessions_to_add: non_empty(sessions_to_add),
        indices_to_delete: non_empty(indices_to_delete),
        indices_to_add: non_empty(indices_to_add),
        indices_to_update: non_empty(indices_to_update),
        sessions_to_update: non_empty(sessions_to_update),
    }
}

/// Sub-diff of one retained session. Slots are matched by id over their
/// explicit position tags; a record is returned only when something changed.
fn diff_session_template(
    original: &ProgramSessionDraft,
    edited: &ProgramSessionDraft,
    sess_id: ProgramSessionId,
) -> Option<ProgramSessionUpdate> {
    let name = (original.name != edited.name).then(|| edited.name.clone());

    let original_slots = tagged_slots(original);
    let edited_slots = tagged_slots(edited);

    let edited_slot_ids: HashSet<ProgramSetId> =
        edited_slots.iter().filter_map(|s| s.set_id).collect();
    let exercises_to_delete: Vec<ProgramSetId> = original_slots
        .iter()
        .filter_map(|s| s.set_id)
        .filter(|id| !edited_slot_ids.contains(id))
        .collect();

    let original_by_id: HashMap<ProgramSetId, &TaggedSlot<'_>> = original_slots
        .iter()
        .filter_map(|s| s.set_id.map(|id| (id, s)))
        .collect();
    let mut exercises_to_add = Vec::new();
    let mut exercises_to_update = Vec::new();
    for slot in &edited_slots {
        match slot.set_id {
            None => exercises_to_add.push(NewProgramSet {
                set_index: slot.set_index,
                exercise_index: slot.exercise_index,
                exercise_name: slot.exercise_name.to_string(),
            }),
            Some(id) => {
                let Some(orig) = original_by_id.get(&id) else {
                    continue;
                };
                let moved = orig.set_index != slot.set_index
                    || orig.exercise_index != slot.exercise_index;
                if moved || orig.exercise_name != slot.exercise_name {
                    exercises_to_update.push(ProgramSetUpdate {
                        id,
                        set_index: slot.set_index,
                        exercise_index: slot.exercise_index,
                        exercise_name: slot.exercise_name.to_string(),
                    });
                }
            }
        }
    }

    let update = ProgramSessionUpdate {
        program_session_id: sess_id,
        name,
        exercises_to_delete: non_empty(exercises_to_delete),
        exercises_to_add: non_empty(exercises_to_add),
        exercises_to_update: non_empty(exercises_to_update),
    };
    let unchanged = update.name.is_none()
        && update.exercises_to_delete.is_none()
        && update.exercises_to_add.is_none()
        && update.exercises_to_update.is_none();
    if unchanged {
        None
    } else {
        Some(update)
    }
}
