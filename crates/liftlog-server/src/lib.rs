//! HTTP API for the liftlog backend.
//!
//! Handlers are thin wrappers over [`service::WorkoutService`], which
//! coordinates validation, diffing, and storage. See [`router::build_router`]
//! for the route table.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
