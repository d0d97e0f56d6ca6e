//! Application state with the shared `WorkoutService`.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use
//! with axum handlers. Uses `tokio::sync::Mutex` (async-aware) instead of
//! `std::sync::Mutex` (blocking) so handlers await the lock without
//! blocking the tokio runtime. `WorkoutService` contains a
//! `rusqlite::Connection`, which is `!Sync`, so an `RwLock` with concurrent
//! readers is not an option; the single-writer mutex matches the store's
//! single-connection design.

use std::sync::Arc;

use crate::error::ApiError;
use crate::service::WorkoutService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<WorkoutService>>,
}

impl AppState {
    /// Creates a new `AppState` backed by the given SQLite database path.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let service = WorkoutService::new(db_path)?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        })
    }

    /// Creates a new `AppState` with an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let service = WorkoutService::in_memory()?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        })
    }
}
