pub mod program;
pub mod session;
pub mod diff;
pub mod schedule;
pub mod timeline;
pub mod units;
pub mod id;
pub mod error;

// Re-export commonly used types
pub use program::{
    NewProgram, NewProgramSession, NewProgramSet, Program, ProgramDraft, ProgramSession,
    ProgramSessionDraft, ProgramSet, SlotDraft, SplitIndex, SplitIndexDraft, SupersetDraft,
};
pub use session::{
    Exercise, ExerciseDraft, ExerciseSession, NewExercise, NewSession, NewSet, SessionDraft,
    SetDraft, SetEntry,
};
pub use diff::program::{diff_program, ProgramChangeSet};
pub use diff::session::{diff_session, SessionChangeSet};
pub use schedule::{current_split_day, future_session_dates, SplitDay};
pub use timeline::insert_and_resort;
pub use units::WeightUnit;
pub use id::{
    ExerciseId, ProgramId, ProgramSessionId, ProgramSetId, SessionId, SetId, SplitIndexId,
};
pub use error::CoreError;
