//! End-to-end integration tests for the liftlog HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! WorkoutService -> diff engines -> storage -> HTTP response.
//!
//! Each test creates a fresh AppState backed by an in-memory SQLite
//! database. Tests use `tower::ServiceExt::oneshot` to send requests
//! directly to the router without starting a network server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::json;
use tower::ServiceExt;

use liftlog_core::program::Program;
use liftlog_core::session::ExerciseSession;
use liftlog_server::router::build_router;
use liftlog_server::state::AppState;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Creates a fresh router backed by an in-memory database.
fn test_app() -> Router {
    let state = AppState::in_memory().expect("failed to create in-memory AppState");
    build_router(state)
}

/// Sends a request with a JSON body and returns (status, json).
async fn send_json(
    app: &Router,
    method: &str,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", path, body).await
}

/// Sends a GET request and returns (status, json).
async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

/// Creates a user and returns the user id.
async fn setup_user(app: &Router) -> i64 {
    let (status, body) = post_json(app, "/users", json!({ "name": "cody" })).await;
    assert_eq!(status, StatusCode::OK, "create user failed: {:?}", body);
    body["id"].as_i64().unwrap()
}

/// Creates a two-session program and returns the canonical tree.
async fn setup_program(app: &Router, user_id: i64) -> Program {
    let (status, body) = post_json(
        app,
        &format!("/users/{}/programs", user_id),
        json!({
            "program_name": "PPL",
            "split_length": 7,
            "program_sessions": [
                {
                    "name": "Push",
                    "split_indices": [0, 3],
                    "program_sets": [
                        { "set_index": 0, "exercise_index": 0, "exercise_name": "bench press" },
                        { "set_index": 0, "exercise_index": 1, "exercise_name": "dips" }
                    ]
                },
                {
                    "name": "Pull",
                    "split_indices": [1],
                    "program_sets": [
                        { "set_index": 0, "exercise_index": 0, "exercise_name": "rows" }
                    ]
                }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create program failed: {:?}", body);
    serde_json::from_value(body).unwrap()
}

/// Logs a session for the user and returns the canonical tree.
async fn setup_session(app: &Router, user_id: i64, date: &str) -> ExerciseSession {
    let (status, body) = post_json(
        app,
        &format!("/users/{}/sessions", user_id),
        json!({
            "unit": "KG",
            "session": {
                "date": date,
                "exercises": [
                    {
                        "name": "squat",
                        "sets": [
                            { "set_number": 1, "reps": 5, "weight": 100.0 },
                            { "set_number": 2, "reps": 5, "weight": 102.5 }
                        ]
                    }
                ]
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create session failed: {:?}", body);
    serde_json::from_value(body).unwrap()
}

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_program_returns_canonical_tree() {
    let app = test_app();
    let user = setup_user(&app).await;
    let program = setup_program(&app, user).await;

    assert_eq!(program.program_name, "PPL");
    assert_eq!(program.program_sessions.len(), 2);
    assert_eq!(program.program_sessions[0].program_sets.len(), 2);
    // Every id populated.
    assert!(program.program_sessions[0].program_sets[0].id.0 > 0);
}

#[tokio::test]
async fn overview_collects_everything() {
    let app = test_app();
    let user = setup_user(&app).await;
    setup_program(&app, user).await;
    setup_session(&app, user, "2024-03-04T18:00:00Z").await;

    let (status, body) = get_json(&app, &format!("/users/{}/overview", user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["programs"].as_array().unwrap().len(), 1);
    assert_eq!(body["sessions"].as_array().unwrap().len(), 1);
    assert!(body["current_program"].is_null());
}

#[tokio::test]
async fn program_edit_renames_session_and_adds_slot() {
    let app = test_app();
    let user = setup_user(&app).await;
    let program = setup_program(&app, user).await;

    let mut draft = program.to_draft();
    draft.program_sessions[0].name = "Push Day".to_string();
    draft.program_sessions[0].program_sets[0]
        .sets
        .push(liftlog_core::program::SlotDraft {
            set_id: None,
            exercise_name: "ohp".to_string(),
        });

    let (status, body) = post_json(
        &app,
        &format!("/programs/{}/edits", program.program_id.0),
        serde_json::to_value(&draft).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "edit failed: {:?}", body);

    // The change-set batches both changes into one session update and
    // leaves every other field null.
    let changes = &body["changes"];
    assert!(changes["program_name"].is_null());
    assert!(changes["split_length"].is_null());
    assert!(changes["sessions_to_delete"].is_null());
    assert!(changes["sessions_to_add"].is_null());
    assert!(changes["indices_to_add"].is_null());
    let updates = changes["sessions_to_update"].as_array().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["name"], "Push Day");
    assert_eq!(
        updates[0]["exercises_to_add"][0]["exercise_name"],
        "ohp"
    );
    assert!(updates[0]["exercises_to_delete"].is_null());

    // The canonical tree reflects the edit with the old slot ids intact.
    let updated: Program = serde_json::from_value(body["program"].clone()).unwrap();
    assert_eq!(updated.program_sessions[0].name, "Push Day");
    assert_eq!(updated.program_sessions[0].program_sets.len(), 3);
    assert_eq!(
        updated.program_sessions[0].program_sets[0].id,
        program.program_sessions[0].program_sets[0].id
    );
}

#[tokio::test]
async fn no_op_edit_returns_all_null_change_set() {
    let app = test_app();
    let user = setup_user(&app).await;
    let program = setup_program(&app, user).await;

    let draft = program.to_draft();
    let (status, body) = post_json(
        &app,
        &format!("/programs/{}/edits", program.program_id.0),
        serde_json::to_value(&draft).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    for field in [
        "program_name",
        "split_length",
        "sessions_to_delete",
        "sessions_to_add",
        "indices_to_delete",
        "indices_to_add",
        "indices_to_update",
        "sessions_to_update",
    ] {
        assert!(body["changes"][field].is_null(), "{} not null", field);
    }
}

#[tokio::test]
async fn raw_change_set_patch_applies() {
    let app = test_app();
    let user = setup_user(&app).await;
    let program = setup_program(&app, user).await;

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/programs/{}", program.program_id.0),
        json!({
            "program_name": "PPL v2",
            "split_length": null,
            "sessions_to_delete": null,
            "sessions_to_add": null,
            "indices_to_delete": null,
            "indices_to_add": null,
            "indices_to_update": null,
            "sessions_to_update": null
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "patch failed: {:?}", body);
    assert_eq!(body["program_name"], "PPL v2");
}

#[tokio::test]
async fn invalid_draft_is_rejected_with_422() {
    let app = test_app();
    let user = setup_user(&app).await;
    let program = setup_program(&app, user).await;

    let mut draft = program.to_draft();
    // Assign the same day twice.
    draft.split_indices[1].split_index = draft.split_indices[0].split_index;
    let (status, body) = post_json(
        &app,
        &format!("/programs/{}/edits", program.program_id.0),
        serde_json::to_value(&draft).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn unknown_user_is_404() {
    let app = test_app();
    setup_user(&app).await;
    let (status, body) = get_json(&app, "/users/999/programs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Logged sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_edit_diffs_and_applies() {
    let app = test_app();
    let user = setup_user(&app).await;
    let session = setup_session(&app, user, "2024-03-04T18:00:00Z").await;

    let mut draft = session.to_draft(liftlog_core::units::WeightUnit::Kg);
    draft.exercises[0].sets[1].reps = 3;

    let (status, body) = post_json(
        &app,
        &format!("/sessions/{}/edits", session.sid.0),
        json!({ "unit": "KG", "session": serde_json::to_value(&draft).unwrap() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "edit failed: {:?}", body);

    let updates = body["changes"]["exercises_to_update"].as_array().unwrap();
    let set_updates = updates[0]["sets_to_update"].as_array().unwrap();
    assert_eq!(set_updates.len(), 1);
    assert_eq!(set_updates[0]["reps"], 3);
    assert!(set_updates[0]["weight"].is_null());

    let updated: ExerciseSession = serde_json::from_value(body["session"].clone()).unwrap();
    assert_eq!(updated.exercises[0].sets[1].reps, 3);
    // Unchanged rows keep their ids.
    assert_eq!(
        updated.exercises[0].sets[0].id,
        session.exercises[0].sets[0].id
    );
}

#[tokio::test]
async fn session_list_stays_newest_first_after_date_edit() {
    let app = test_app();
    let user = setup_user(&app).await;
    let oldest = setup_session(&app, user, "2024-03-01T18:00:00Z").await;
    setup_session(&app, user, "2024-03-02T18:00:00Z").await;
    setup_session(&app, user, "2024-03-03T18:00:00Z").await;

    // Prime the cache.
    let (status, _) = get_json(&app, &format!("/users/{}/sessions", user)).await;
    assert_eq!(status, StatusCode::OK);

    // Move the oldest session to the front by redating it.
    let mut draft = oldest.to_draft(liftlog_core::units::WeightUnit::Kg);
    draft.date = "2024-03-09T18:00:00Z".parse().unwrap();
    let (status, _) = post_json(
        &app,
        &format!("/sessions/{}/edits", oldest.sid.0),
        json!({ "unit": "KG", "session": serde_json::to_value(&draft).unwrap() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, &format!("/users/{}/sessions", user)).await;
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 3);
    assert_eq!(sessions[0]["sid"], oldest.sid.0);
    let dates: Vec<&str> = sessions
        .iter()
        .map(|s| s["date"].as_str().unwrap())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}

#[tokio::test]
async fn half_set_program_link_is_rejected() {
    let app = test_app();
    let user = setup_user(&app).await;
    let session = setup_session(&app, user, "2024-03-04T18:00:00Z").await;

    let mut draft = session.to_draft(liftlog_core::units::WeightUnit::Kg);
    draft.program_id = Some(liftlog_core::id::ProgramId(1));
    let (status, body) = post_json(
        &app,
        &format!("/sessions/{}/edits", session.sid.0),
        json!({ "unit": "KG", "session": serde_json::to_value(&draft).unwrap() }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{:?}", body);
}

#[tokio::test]
async fn delete_session_removes_it_from_the_list() {
    let app = test_app();
    let user = setup_user(&app).await;
    let session = setup_session(&app, user, "2024-03-04T18:00:00Z").await;

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/sessions/{}", session.sid.0),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, &format!("/users/{}/sessions", user)).await;
    assert_eq!(body["sessions"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[tokio::test]
async fn schedule_follows_the_current_program() {
    let app = test_app();
    let user = setup_user(&app).await;
    let program = setup_program(&app, user).await;

    // Anchor the cycle at today so the indices are deterministic.
    let today = Utc::now().date_naive();
    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/users/{}/current-program", user),
        json!({ "program_id": program.program_id.0, "start_date": today.to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{:?}", body);
    assert_eq!(body["current"]["program_name"], "PPL");

    // Day 0 of the split is "Push".
    let (status, body) = get_json(&app, &format!("/users/{}/schedule/today", user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["index"], 0);
    assert_eq!(body["session_name"], "Push");

    // Days 0, 1, 3 of the 7-day cycle are training days.
    let (status, body) =
        get_json(&app, &format!("/users/{}/schedule/upcoming?days=7", user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dates"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn schedule_without_current_program_is_404() {
    let app = test_app();
    let user = setup_user(&app).await;
    let (status, _) = get_json(&app, &format!("/users/{}/schedule/today", user)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
