//! Clinic Service
//!
//! Caller-facing operations over the timer registry, stores and reminder
//! scheduler. Category strings are resolved against the configured set here,
//! so the components below only ever see valid categories.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::database::{CheckupStore, DatabaseManager, SettingsStore};
use crate::error::AppResult;
use crate::logging::log_setting_updated;
use crate::models::settings::{parse_reminder_interval, validate_setting};
use crate::models::{
    ActiveTimerView, AggregateRow, AnalyticsSummary, CategorySet, CompletedSession, EpochMillis,
    NewCheckup, Period, SettingEntry, TimeWindow, REMINDER_INTERVAL_KEY,
};
use crate::services::notifier::Notifier;
use crate::services::period_calculator::PeriodCalculator;
use crate::services::reminder_scheduler::ReminderScheduler;
use crate::services::time_provider::TimeProvider;
use crate::services::timer_registry::{StartOutcome, TimerRegistry};

/// Facade shared by the HTTP handlers
pub struct ClinicService {
    registry: TimerRegistry,
    scheduler: ReminderScheduler,
    checkups: CheckupStore,
    settings: SettingsStore,
    calculator: PeriodCalculator,
    categories: CategorySet,
    time_provider: Arc<dyn TimeProvider>,
    /// Held across a setting write and the reschedule it triggers
    settings_update: Mutex<()>,
}

impl ClinicService {
    pub fn new(
        database: &DatabaseManager,
        categories: CategorySet,
        calculator: PeriodCalculator,
        notifier: Arc<dyn Notifier>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        let checkups = database.checkup_store();
        let registry = TimerRegistry::new(checkups.clone(), Arc::clone(&time_provider));
        let scheduler = ReminderScheduler::new(registry.active_counter(), notifier);

        Self {
            registry,
            scheduler,
            checkups,
            settings: database.settings_store(),
            calculator,
            categories,
            time_provider,
            settings_update: Mutex::new(()),
        }
    }

    /// Start the reminder ticker at the stored interval
    pub async fn start_reminders(&self) -> AppResult<u64> {
        let stored = self.settings.get(REMINDER_INTERVAL_KEY).await?;
        let minutes = parse_reminder_interval(stored.as_deref());
        self.scheduler.start(minutes).await;
        Ok(self.scheduler.interval_minutes())
    }

    pub async fn shutdown(&self) {
        self.scheduler.stop().await;
        info!("Clinic service stopped");
    }

    pub async fn start_timer(&self, category: &str) -> AppResult<StartOutcome> {
        let category = self.categories.resolve(category)?;
        Ok(self.registry.start(category).await)
    }

    /// Stop a running timer. `None` when the category was idle.
    pub async fn stop_timer(&self, category: &str) -> AppResult<Option<CompletedSession>> {
        let category = self.categories.resolve(category)?;
        Ok(self.registry.stop(&category).await?)
    }

    /// Store a session timed elsewhere. Saving the same session twice returns
    /// the stored one. Running timers are not affected.
    pub async fn save_completed_session(
        &self,
        category: &str,
        started_at: EpochMillis,
        ended_at: EpochMillis,
    ) -> AppResult<CompletedSession> {
        let fields = NewCheckup {
            category: self.categories.resolve(category)?,
            started_at,
            ended_at,
        };
        Ok(self.checkups.insert_idempotent(&fields).await?)
    }

    pub async fn active_timers(&self) -> Vec<ActiveTimerView> {
        self.registry.active_timers().await
    }

    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }

    /// Window for `period` around the current instant
    pub fn window_for(&self, period: &str) -> AppResult<(Period, TimeWindow)> {
        let period = Period::parse(period)?;
        let window = self.calculator.bounds(period, self.time_provider.now_utc());
        debug!(%period, start = window.start, end = window.end, "Resolved period window");
        Ok((period, window))
    }

    pub async fn get_averages(&self, period: &str) -> AppResult<Vec<AggregateRow>> {
        let (_, window) = self.window_for(period)?;
        Ok(self.checkups.query_averages(window).await?)
    }

    pub async fn get_summary(&self, period: &str) -> AppResult<AnalyticsSummary> {
        let (period, window) = self.window_for(period)?;
        let rows = self.checkups.query_averages(window).await?;
        Ok(AnalyticsSummary::from_rows(period, window, &rows))
    }

    /// Completed sessions started within `period`, newest first
    pub async fn sessions_in(&self, period: &str) -> AppResult<Vec<CompletedSession>> {
        let (_, window) = self.window_for(period)?;
        Ok(self.checkups.sessions_between(window).await?)
    }

    pub async fn get_settings(&self) -> AppResult<BTreeMap<String, String>> {
        Ok(self.settings.get_all().await?)
    }

    pub async fn get_setting(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.settings.get(key).await?)
    }

    /// Persist a setting verbatim. Changing the reminder interval reschedules
    /// the reminder ticker; unusable values fall back to the default cadence.
    pub async fn update_setting(&self, key: &str, value: &str) -> AppResult<SettingEntry> {
        validate_setting(key, value)?;
        let _guard = self.settings_update.lock().await;
        self.settings.set(key, value).await?;
        log_setting_updated(key, value);

        if key == REMINDER_INTERVAL_KEY {
            self.scheduler
                .reconfigure(parse_reminder_interval(Some(value)))
                .await;
        }

        Ok(SettingEntry::new(key, value))
    }

    pub fn reminder_interval_minutes(&self) -> u64 {
        self.scheduler.interval_minutes()
    }

    pub async fn reminders_running(&self) -> bool {
        self.scheduler.is_running().await
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }
}
