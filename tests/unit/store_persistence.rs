//! Store initialization and durability tests against a file database

use clinic_timer::database::DatabaseManager;
use clinic_timer::models::{Category, NewCheckup, TimeWindow, REMINDER_INTERVAL_KEY};
use tempfile::TempDir;

/// File database inside a directory removed on drop, sidecar files included
struct TempDatabase {
    dir: TempDir,
}

impl TempDatabase {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn url(&self) -> String {
        format!("sqlite:{}", self.dir.path().join("clinic.db").display())
    }

    async fn open(&self) -> DatabaseManager {
        let db = DatabaseManager::new(&self.url()).await.unwrap();
        db.migrate().await.unwrap();
        db
    }
}

fn checkup(code: &str, started_at: i64, seconds: i64) -> NewCheckup {
    NewCheckup {
        category: Category::parse(code).unwrap(),
        started_at,
        ended_at: started_at + seconds * 1000,
    }
}

#[tokio::test]
async fn test_reopen_keeps_sessions_and_settings() {
    let temp = TempDatabase::new();

    let db = temp.open().await;
    db.checkup_store().insert(&checkup("A", 1_000, 60)).await.unwrap();
    db.checkup_store().insert(&checkup("A", 2_000, 120)).await.unwrap();
    db.settings_store().set(REMINDER_INTERVAL_KEY, "15").await.unwrap();
    db.close().await;

    // Second startup runs migrations again
    let db = temp.open().await;
    assert_eq!(db.checkup_store().count().await.unwrap(), 2);

    let settings = db.settings_store().get_all().await.unwrap();
    assert_eq!(settings.len(), 1);
    assert_eq!(settings[REMINDER_INTERVAL_KEY], "15");

    let rows = db
        .checkup_store()
        .query_averages(TimeWindow { start: 0, end: 10_000 })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].average_duration_seconds, 90.0);
    db.close().await;
}

#[tokio::test]
async fn test_ids_keep_increasing_across_restarts() {
    let temp = TempDatabase::new();

    let db = temp.open().await;
    let first = db.checkup_store().insert(&checkup("B", 0, 1)).await.unwrap();
    db.close().await;

    let db = temp.open().await;
    let second = db.checkup_store().insert(&checkup("B", 0, 1)).await.unwrap();
    assert!(second.id > first.id);
    db.close().await;
}

#[tokio::test]
async fn test_seed_only_into_empty_settings() {
    let temp = TempDatabase::new();

    let db = temp.open().await;
    db.migrate().await.unwrap();
    db.migrate().await.unwrap();

    let settings = db.settings_store().get_all().await.unwrap();
    assert_eq!(settings.len(), 1);
    assert_eq!(settings[REMINDER_INTERVAL_KEY], "5");
    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resubmits_store_one_row() {
    let temp = TempDatabase::new();
    let db = temp.open().await;

    for round in 0..20_i64 {
        let fields = NewCheckup {
            category: Category::parse("A").unwrap(),
            started_at: round * 1_000,
            ended_at: round * 1_000 + 5_000,
        };

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let store = db.checkup_store();
                let fields = fields.clone();
                tokio::spawn(async move { store.insert_idempotent(&fields).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            let session = handle.await.unwrap().unwrap();
            assert_eq!(session.duration_seconds, 5);
            ids.push(session.id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1, "round {round} stored {ids:?}");
    }

    assert_eq!(db.checkup_store().count().await.unwrap(), 20);
    db.close().await;
}
