//! Settings API Integration Tests

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::support::test_app;

#[tokio::test]
async fn test_get_seeded_settings() {
    let app = test_app().await;

    let response = app.server.get("/api/settings").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"reminderIntervalMinutes": "5"})
    );
}

#[tokio::test]
async fn test_update_reminder_interval() {
    let app = test_app().await;
    app.service.start_reminders().await.unwrap();

    let response = app
        .server
        .put("/api/settings/reminderIntervalMinutes")
        .json(&json!({"value": "20"}))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"key": "reminderIntervalMinutes", "value": "20"})
    );

    let health: Value = app.server.get("/api/health").await.json();
    assert_eq!(health["reminder_interval_minutes"], 20);

    let settings: Value = app.server.get("/api/settings").await.json();
    assert_eq!(settings["reminderIntervalMinutes"], "20");

    app.service.shutdown().await;
}

#[tokio::test]
async fn test_malformed_interval_stored_but_falls_back() {
    let app = test_app().await;
    app.service.start_reminders().await.unwrap();

    for value in ["-3", "0", "abc", ""] {
        app.server
            .put("/api/settings/reminderIntervalMinutes")
            .json(&json!({ "value": value }))
            .await
            .assert_status_ok();
        assert_eq!(app.service.reminder_interval_minutes(), 5, "value {value:?}");
    }

    let settings: Value = app.server.get("/api/settings").await.json();
    assert_eq!(settings["reminderIntervalMinutes"], "");

    app.service.shutdown().await;
}

#[tokio::test]
async fn test_arbitrary_keys_upsert() {
    let app = test_app().await;

    for value in ["Northside", "Eastside"] {
        app.server
            .put("/api/settings/clinicName")
            .json(&json!({ "value": value }))
            .await
            .assert_status_ok();
    }

    let settings: Value = app.server.get("/api/settings").await.json();
    assert_eq!(
        settings,
        json!({"clinicName": "Eastside", "reminderIntervalMinutes": "5"})
    );
}

#[tokio::test]
async fn test_oversized_value_rejected() {
    let app = test_app().await;

    let response = app
        .server
        .put("/api/settings/notes")
        .json(&json!({"value": "x".repeat(2048)}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "InvalidSetting");
}
