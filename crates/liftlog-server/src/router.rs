//! Router assembly for the liftlog HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
/// CORS is permissive (clients call from various origins).
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Users
        .route("/users", post(handlers::users::create_user))
        .route("/users/{id}/overview", get(handlers::users::overview))
        // Programs
        .route(
            "/users/{id}/programs",
            get(handlers::programs::list_programs)
                .post(handlers::programs::create_program),
        )
        .route(
            "/programs/{id}",
            patch(handlers::programs::update_program)
                .delete(handlers::programs::delete_program),
        )
        .route(
            "/programs/{id}/edits",
            post(handlers::programs::edit_program),
        )
        // Logged sessions
        .route(
            "/users/{id}/sessions",
            get(handlers::sessions::list_sessions)
                .post(handlers::sessions::create_session),
        )
        .route(
            "/sessions/{sid}",
            patch(handlers::sessions::update_session)
                .delete(handlers::sessions::delete_session),
        )
        .route(
            "/sessions/{sid}/edits",
            post(handlers::sessions::edit_session),
        )
        // Current program and schedule
        .route(
            "/users/{id}/current-program",
            get(handlers::schedule::get_current_program)
                .put(handlers::schedule::set_current_program),
        )
        .route(
            "/users/{id}/schedule/today",
            get(handlers::schedule::today),
        )
        .route(
            "/users/{id}/schedule/upcoming",
            get(handlers::schedule::upcoming),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
