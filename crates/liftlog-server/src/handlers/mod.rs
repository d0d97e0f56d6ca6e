//! HTTP handlers, one module per route group.

pub mod programs;
pub mod schedule;
pub mod sessions;
pub mod users;
