//! Shared test application setup

use std::sync::Arc;

use axum_test::TestServer;
use clinic_timer::api::create_router;
use clinic_timer::config::Config;
use clinic_timer::database::DatabaseManager;
use clinic_timer::models::CategorySet;
use clinic_timer::services::{ClinicService, MemoryNotifier, MockTimeProvider, PeriodCalculator};

/// 2024-03-15T14:30:00Z
pub const NOW_MS: i64 = 1_710_513_000_000;

pub struct TestApp {
    pub server: TestServer,
    pub service: Arc<ClinicService>,
    pub clock: MockTimeProvider,
    pub database: DatabaseManager,
    pub notifier: Arc<MemoryNotifier>,
}

pub async fn test_app() -> TestApp {
    let database = DatabaseManager::in_memory().await.unwrap();
    let clock = MockTimeProvider::from_millis(NOW_MS);
    let notifier = Arc::new(MemoryNotifier::new());

    let service = Arc::new(ClinicService::new(
        &database,
        CategorySet::default(),
        PeriodCalculator::default(),
        notifier.clone(),
        Arc::new(clock.clone()),
    ));

    let server = TestServer::new(create_router(Arc::clone(&service), &Config::default())).unwrap();

    TestApp {
        server,
        service,
        clock,
        database,
        notifier,
    }
}
