//! Request/response types for the HTTP API, one module per route group.

pub mod programs;
pub mod schedule;
pub mod sessions;
pub mod users;
