//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crossroads_content::Deck;
use crossroads_core::clock::Clock;
use crossroads_event_store::MemoryEventRepository;
use crossroads_session::application::advance_scheduler::AdvanceMode;
use crossroads_test_support::FixedClock;

use crossroads_api::routes;
use crossroads_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over a fresh in-memory event store with the
/// built-in deck and manual advance mode. Uses the same route structure as
/// `main.rs`. Clone the returned router per request; state is shared.
pub fn build_test_app() -> Router {
    build_test_app_with_mode(AdvanceMode::Manual)
}

/// Build the full app router in timed advance mode with the given pause.
pub fn build_timed_test_app(delay: Duration) -> Router {
    build_test_app_with_mode(AdvanceMode::Timed(delay))
}

fn build_test_app_with_mode(advance_mode: AdvanceMode) -> Router {
    let app_state = AppState::new(
        fixed_clock(),
        Arc::new(MemoryEventRepository::new()),
        Arc::new(Deck::builtin()),
        advance_mode,
    );

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::session::router())
        .nest("/api/v1/results", routes::results::router())
        .nest("/api/v1/content", routes::content::router())
        .with_state(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a bodyless POST request and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Start a session over HTTP and return its id.
pub async fn start_session(app: &Router) -> uuid::Uuid {
    let (status, json) = post_empty(app.clone(), "/api/v1/sessions/start").await;
    assert_eq!(status, StatusCode::OK);
    json["aggregate_id"].as_str().unwrap().parse().unwrap()
}

/// Record a choice and advance manually, asserting both succeed.
pub async fn play_choice(app: &Router, session_id: uuid::Uuid, framework: &str) {
    let (status, _) = post_json(
        app.clone(),
        "/api/v1/sessions/record-choice",
        &serde_json::json!({ "session_id": session_id, "framework": framework }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        app.clone(),
        "/api/v1/sessions/advance",
        &serde_json::json!({ "session_id": session_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
