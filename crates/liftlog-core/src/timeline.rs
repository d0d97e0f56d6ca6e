//! Ordered session list maintenance.
//!
//! Session lists are kept in reverse-chronological order. After a create or
//! an update, the touched session is placed back with a local two-direction
//! bubble instead of a full re-sort: O(n) worst case, O(1) for the common
//! small date change.

use crate::session::ExerciseSession;

/// Replaces the entry with `updated`'s id (or appends it), then bubbles it
/// to its ordered position. The list stays sorted by date descending with
/// no entry duplicated or dropped.
pub fn insert_and_resort(sessions: &mut Vec<ExerciseSession>, updated: ExerciseSession) {
    let mut i = match sessions.iter().position(|s| s.sid == updated.sid) {
        Some(i) => {
            sessions[i] = updated;
            i
        }
        None => {
            sessions.push(updated);
            sessions.len() - 1
        }
    };
    while i > 0 && sessions[i].date > sessions[i - 1].date {
        sessions.swap(i, i - 1);
        i -= 1;
    }
    while i + 1 < sessions.len() && sessions[i].date < sessions[i + 1].date {
        sessions.swap(i, i + 1);
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SessionId;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn session(sid: i64, secs: i64) -> ExerciseSession {
        ExerciseSession {
            sid: SessionId(sid),
            date: at(secs),
            program_id: None,
            program_session_id: None,
            exercises: Vec::new(),
        }
    }

    fn assert_sorted_desc(sessions: &[ExerciseSession]) {
        for pair in sessions.windows(2) {
            assert!(pair[0].date >= pair[1].date, "list not descending");
        }
    }

    #[test]
    fn appends_into_position() {
        let mut list = vec![session(1, 300), session(2, 200), session(3, 100)];
        insert_and_resort(&mut list, session(4, 250));
        assert_eq!(
            list.iter().map(|s| s.sid.0).collect::<Vec<_>>(),
            vec![1, 4, 2, 3]
        );
    }

    #[test]
    fn moves_forward_when_date_grows() {
        let mut list = vec![session(1, 300), session(2, 200), session(3, 100)];
        insert_and_resort(&mut list, session(3, 400));
        assert_eq!(
            list.iter().map(|s| s.sid.0).collect::<Vec<_>>(),
            vec![3, 1, 2]
        );
    }

    #[test]
    fn moves_backward_when_date_shrinks() {
        let mut list = vec![session(1, 300), session(2, 200), session(3, 100)];
        insert_and_resort(&mut list, session(1, 150));
        assert_eq!(
            list.iter().map(|s| s.sid.0).collect::<Vec<_>>(),
            vec![2, 1, 3]
        );
    }

    #[test]
    fn replaces_in_place_when_order_unchanged() {
        let mut list = vec![session(1, 300), session(2, 200)];
        insert_and_resort(&mut list, session(2, 210));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].sid, SessionId(2));
        assert_eq!(list[1].date, at(210));
    }

    proptest! {
        #[test]
        fn stays_sorted_under_arbitrary_updates(
            ops in prop::collection::vec((0i64..20, 0i64..1_000_000), 1..60)
        ) {
            let mut list: Vec<ExerciseSession> = Vec::new();
            for (sid, secs) in ops {
                insert_and_resort(&mut list, session(sid, secs));
                assert_sorted_desc(&list);
                // One entry per id, nothing dropped.
                let mut ids: Vec<i64> = list.iter().map(|s| s.sid.0).collect();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), list.len());
            }
        }
    }
}
