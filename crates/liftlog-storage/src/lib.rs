//! Storage layer for workout programs and logged sessions.
//!
//! Provides the [`WorkoutStore`] trait defining the storage contract, with
//! [`SqliteStore`] as the backend.
//!
//! # Architecture
//!
//! The store exposes whole-tree operations only: creation takes a full tree
//! with no ids and returns the canonical tree with every id populated;
//! updates take a change-set produced by the diff engines in
//! `liftlog-core` and apply every operation inside ONE transaction, then
//! re-read and return the fresh canonical tree. Callers substitute that
//! tree wholesale for their cached copy -- there is no partial merge.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: UserId, CurrentProgram storage-layer types
//! - [`traits`]: WorkoutStore trait definition
//! - [`sqlite`]: SqliteStore implementation, including connection pragmas
//!   and embedded schema migrations

pub mod error;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use traits::WorkoutStore;
pub use types::{CurrentProgram, UserId};
