//! Change-set reconciliation engines.
//!
//! Both engines compare a previously persisted tree against a user-edited
//! draft of the same tree and produce the minimal set of create, update,
//! and delete operations needed to bring storage in line -- without ever
//! re-creating an unchanged nested child, which would churn ids that other
//! rows reference (logged sessions point at program-session ids).
//!
//! Every operation-list field of a change-set is an `Option`: `None` means
//! "nothing to do for this kind of operation", and an empty list is never
//! emitted. The storage layer applies one change-set inside one atomic
//! transaction and returns the fresh canonical tree.

pub mod program;
pub mod session;

/// The "non-empty or nothing" sentinel shared by every operation list.
pub(crate) fn non_empty<T>(ops: Vec<T>) -> Option<Vec<T>> {
    if ops.is_empty() {
        None
    } else {
        Some(ops)
    }
}
