//! Timer Registry concurrency tests

use std::sync::Arc;

use clinic_timer::database::DatabaseManager;
use clinic_timer::models::Category;
use clinic_timer::services::{MockTimeProvider, TimerRegistry};

fn category(code: &str) -> Category {
    Category::parse(code).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_starts_create_one_timer_per_category() {
    let db = DatabaseManager::in_memory().await.unwrap();
    let clock = MockTimeProvider::from_millis(10_000);
    let registry = Arc::new(TimerRegistry::new(db.checkup_store(), Arc::new(clock)));

    let mut handles = Vec::new();
    for code in ["A", "B", "C", "D"] {
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.start(category(code)).await.is_new()
            }));
        }
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap() {
            created += 1;
        }
    }

    assert_eq!(created, 4);
    assert_eq!(registry.active_count(), 4);
    assert_eq!(registry.active_timers().await.len(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interleaved_start_stop_keeps_count_consistent() {
    let db = DatabaseManager::in_memory().await.unwrap();
    let clock = MockTimeProvider::from_millis(0);
    let registry = Arc::new(TimerRegistry::new(db.checkup_store(), Arc::new(clock.clone())));

    let mut handles = Vec::new();
    for round in 0..20 {
        for code in ["A", "B", "C"] {
            let registry = Arc::clone(&registry);
            let clock = clock.clone();
            handles.push(tokio::spawn(async move {
                let category = category(code);
                registry.start(category.clone()).await;
                clock.advance_millis(round * 10);
                registry.stop(&category).await.unwrap().is_some()
            }));
        }
    }

    let mut recorded = 0;
    for handle in handles {
        if handle.await.unwrap() {
            recorded += 1;
        }
    }

    // Every task stops its own category, so nothing is left running
    assert_eq!(registry.active_count(), 0);
    assert!(registry.active_timers().await.is_empty());
    assert_eq!(db.checkup_store().count().await.unwrap(), recorded);
    assert!(recorded >= 3);
}

#[tokio::test]
async fn test_restart_after_stop_is_a_new_session() {
    let db = DatabaseManager::in_memory().await.unwrap();
    let clock = MockTimeProvider::from_millis(0);
    let registry = TimerRegistry::new(db.checkup_store(), Arc::new(clock.clone()));

    registry.start(category("A")).await;
    clock.advance_seconds(60);
    let first = registry.stop(&category("A")).await.unwrap().unwrap();

    clock.advance_seconds(5);
    let restarted = registry.start(category("A")).await;
    assert!(restarted.is_new());
    assert_eq!(restarted.timer().started_at, 65_000);

    clock.advance_seconds(30);
    let second = registry.stop(&category("A")).await.unwrap().unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.duration_seconds, 60);
    assert_eq!(second.duration_seconds, 30);
}
