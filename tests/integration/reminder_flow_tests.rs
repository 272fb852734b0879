//! Reminder wiring tests
//!
//! Setup touches the database on the real clock; tokio time is paused only
//! afterwards, while the flow uses just the in-memory registry and ticker.

use std::time::Duration;

use clinic_timer::models::REMINDER_INTERVAL_KEY;
use tokio::time;

use crate::support::test_app;

const MINUTE: Duration = Duration::from_secs(60);

#[tokio::test]
async fn test_reminder_fires_only_while_timer_runs() {
    let app = test_app().await;
    app.service
        .update_setting(REMINDER_INTERVAL_KEY, "2")
        .await
        .unwrap();
    time::pause();

    time::sleep(2 * MINUTE + Duration::from_secs(1)).await;
    assert_eq!(app.notifier.count(), 0);

    app.service.start_timer("A").await.unwrap();
    time::sleep(2 * MINUTE).await;
    assert_eq!(app.notifier.count(), 1);

    let sent = app.notifier.sent();
    assert_eq!(sent[0].title, "Clinic Reminder");
    assert_eq!(sent[0].body, "Time is passing.");

    app.service.shutdown().await;
}

#[tokio::test]
async fn test_interval_change_delays_next_reminder() {
    let app = test_app().await;
    app.service.start_timer("B").await.unwrap();
    app.service
        .update_setting(REMINDER_INTERVAL_KEY, "3")
        .await
        .unwrap();
    time::pause();

    time::sleep(2 * MINUTE).await;
    assert_eq!(app.notifier.count(), 0);

    time::sleep(MINUTE + Duration::from_secs(1)).await;
    assert_eq!(app.notifier.count(), 1);

    app.service.shutdown().await;
    time::sleep(10 * MINUTE).await;
    assert_eq!(app.notifier.count(), 1);
}
