//! Timer API Integration Tests

use axum::http::StatusCode;
use serde_json::Value;

use crate::support::{test_app, NOW_MS};

#[tokio::test]
async fn test_start_is_idempotent() {
    let app = test_app().await;

    let first: Value = app.server.post("/api/timers/A/start").await.json();
    assert_eq!(first["started"], true);
    assert_eq!(first["timer"]["category"], "A");
    assert_eq!(first["timer"]["started_at"], NOW_MS);
    assert_eq!(first["active_count"], 1);

    app.clock.advance_seconds(20);
    let second: Value = app.server.post("/api/timers/A/start").await.json();
    assert_eq!(second["started"], false);
    assert_eq!(second["timer"]["started_at"], NOW_MS);
    assert_eq!(second["active_count"], 1);
}

#[tokio::test]
async fn test_stop_returns_session_then_null() {
    let app = test_app().await;

    app.server.post("/api/timers/B/start").await.assert_status_ok();
    app.clock.advance_millis(1_998_500);

    let response = app.server.post("/api/timers/B/stop").await;
    response.assert_status_ok();
    let session: Value = response.json();
    assert_eq!(session["category"], "B");
    assert_eq!(session["started_at"], NOW_MS);
    assert_eq!(session["ended_at"], NOW_MS + 1_998_500);
    assert_eq!(session["duration_seconds"], 1998);

    let again = app.server.post("/api/timers/B/stop").await;
    again.assert_status_ok();
    assert_eq!(again.json::<Value>(), Value::Null);
    assert_eq!(app.database.checkup_store().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_stop_without_start_is_null() {
    let app = test_app().await;

    let response = app.server.post("/api/timers/C/stop").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), Value::Null);
    assert_eq!(app.service.active_count(), 0);
}

#[tokio::test]
async fn test_list_active_timers() {
    let app = test_app().await;

    app.server.post("/api/timers/D/start").await;
    app.clock.advance_seconds(3);
    app.server.post("/api/timers/A/start").await;
    app.clock.advance_seconds(2);

    let list: Value = app.server.get("/api/timers").await.json();
    assert_eq!(list["active_count"], 2);
    assert_eq!(list["timers"][0]["category"], "A");
    assert_eq!(list["timers"][0]["elapsed_ms"], 2_000);
    assert_eq!(list["timers"][1]["category"], "D");
    assert_eq!(list["timers"][1]["elapsed_ms"], 5_000);
}

#[tokio::test]
async fn test_unknown_and_malformed_categories_rejected() {
    let app = test_app().await;

    let unknown = app.server.post("/api/timers/Z/start").await;
    unknown.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(unknown.json::<Value>()["error"], "UnknownCategory");

    let malformed = app.server.post("/api/timers/-bad/stop").await;
    malformed.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(malformed.json::<Value>()["error"], "InvalidCategory");

    assert_eq!(app.service.active_count(), 0);
}

#[tokio::test]
async fn test_store_outage_keeps_timer_running() {
    let app = test_app().await;

    app.server.post("/api/timers/A/start").await.assert_status_ok();
    app.clock.advance_seconds(45);
    app.database.close().await;

    let response = app.server.post("/api/timers/A/stop").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["error"], "StoreUnavailable");

    let list: Value = app.server.get("/api/timers").await.json();
    assert_eq!(list["active_count"], 1);
    assert_eq!(app.service.active_count(), 1);
}
