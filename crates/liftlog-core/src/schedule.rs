//! The split-schedule calculator.
//!
//! A program's split is a repeating cycle of `split_length` days anchored at
//! a start date. Both functions reduce a calendar distance to a day-in-cycle
//! with `rem_euclid`, which stays non-negative even when today precedes the
//! start date.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::program::Program;

/// Where a calendar date falls in a program's split. `session_name` is
/// `None` on a rest day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitDay {
    pub index: u8,
    pub session_name: Option<String>,
}

/// Computes which split day `today` falls on and which session, if any, is
/// assigned to it.
pub fn current_split_day(program: &Program, start_date: NaiveDate, today: NaiveDate) -> SplitDay {
    let days_since_start = (today - start_date).num_days();
    let index = days_since_start.rem_euclid(i64::from(program.split_length)) as u8;
    let session_name = program
        .program_sessions
        .iter()
        .find(|sess| sess.split_indices.iter().any(|si| si.index == index))
        .map(|sess| sess.name.clone());
    SplitDay {
        index,
        session_name,
    }
}

/// Enumerates every training date in the half-open range
/// `[today, today + horizon_days)`: the dates whose split day is assigned to
/// any session of the program.
///
/// Walks with an accumulating day offset rather than recomputing the date
/// difference per iteration.
pub fn future_session_dates(
    program: &Program,
    start_date: NaiveDate,
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<NaiveDate> {
    let training_days: HashSet<u8> = program
        .program_sessions
        .iter()
        .flat_map(|sess| sess.split_indices.iter().map(|si| si.index))
        .collect();
    let split_length = i64::from(program.split_length);
    let offset = (today - start_date).num_days();

    let mut dates = Vec::new();
    for day in 0..i64::from(horizon_days) {
        let index = (offset + day).rem_euclid(split_length) as u8;
        if training_days.contains(&index) {
            dates.push(today + Duration::days(day));
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ProgramId, ProgramSessionId, ProgramSetId, SplitIndexId};
    use crate::program::{ProgramSession, ProgramSet, SplitIndex};

    fn weekly_program(indices: &[u8]) -> Program {
        Program {
            program_id: ProgramId(1),
            program_name: "Upper".to_string(),
            split_length: 7,
            program_sessions: vec![ProgramSession {
                id: ProgramSessionId(1),
                name: "Upper A".to_string(),
                split_indices: indices
                    .iter()
                    .enumerate()
                    .map(|(i, &index)| SplitIndex {
                        id: SplitIndexId(i as i64 + 1),
                        index,
                    })
                    .collect(),
                program_sets: vec![ProgramSet {
                    id: ProgramSetId(1),
                    set_index: 0,
                    exercise_index: 0,
                    exercise_name: "bench press".to_string(),
                }],
            }],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn one_cycle_later_is_day_zero_again() {
        let program = weekly_program(&[0]);
        let day = current_split_day(&program, date(2024, 1, 1), date(2024, 1, 8));
        assert_eq!(day.index, 0);
        assert_eq!(day.session_name.as_deref(), Some("Upper A"));
    }

    #[test]
    fn mid_cycle_rest_day_has_no_session() {
        let program = weekly_program(&[0]);
        let day = current_split_day(&program, date(2024, 1, 1), date(2024, 1, 4));
        assert_eq!(day.index, 3);
        assert_eq!(day.session_name, None);
    }

    #[test]
    fn today_before_start_still_lands_in_cycle() {
        // rem_euclid keeps the index non-negative for a negative distance.
        let program = weekly_program(&[0]);
        let day = current_split_day(&program, date(2024, 1, 8), date(2024, 1, 6));
        assert_eq!(day.index, 5);
    }

    #[test]
    fn one_training_day_over_eight_weeks_yields_eight_dates() {
        let program = weekly_program(&[2]);
        let dates = future_session_dates(&program, date(2024, 1, 1), date(2024, 2, 14), 56);
        assert_eq!(dates.len(), 8);
        for pair in dates.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_days(), 7);
        }
    }

    #[test]
    fn horizon_is_half_open() {
        // Whatever the phase, a 7-day split with one training day gives
        // exactly one date per 7-day window.
        let program = weekly_program(&[0]);
        for shift in 0..7 {
            let today = date(2024, 1, 1) + Duration::days(shift);
            let dates = future_session_dates(&program, date(2024, 1, 1), today, 7);
            assert_eq!(dates.len(), 1, "shift {}", shift);
        }
    }

    #[test]
    fn collects_training_days_across_sessions() {
        let mut program = weekly_program(&[0]);
        program.program_sessions.push(ProgramSession {
            id: ProgramSessionId(2),
            name: "Lower A".to_string(),
            split_indices: vec![SplitIndex {
                id: SplitIndexId(9),
                index: 3,
            }],
            program_sets: vec![ProgramSet {
                id: ProgramSetId(2),
                set_index: 0,
                exercise_index: 0,
                exercise_name: "squat".to_string(),
            }],
        });
        let dates = future_session_dates(&program, date(2024, 1, 1), date(2024, 1, 1), 14);
        // Days 0 and 3 of each of the two cycles.
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 4),
                date(2024, 1, 8),
                date(2024, 1, 11),
            ]
        );
    }
}
