//! Reminder Scheduler
//!
//! A single background ticker that nudges staff while any checkup timer is
//! running. The ticker only reads the shared active-timer count, so it never
//! contends with timer start/stop.
//!
//! Reconfiguring aborts the current ticker and spawns a new one whose first
//! tick lands one full interval later. There is never more than one ticker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::logging::{log_reminder_fired, log_reminder_rescheduled};
use crate::models::settings::DEFAULT_REMINDER_INTERVAL_MINUTES;
use crate::services::notifier::{Notifier, REMINDER_BODY, REMINDER_TITLE};
use crate::services::timer_registry::ActiveTimerCount;

/// Longest accepted interval (one year)
pub const MAX_REMINDER_INTERVAL_MINUTES: u64 = 365 * 24 * 60;

/// Periodic reminder while timers are running
pub struct ReminderScheduler {
    active: ActiveTimerCount,
    notifier: Arc<dyn Notifier>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    interval_minutes: AtomicU64,
}

impl ReminderScheduler {
    pub fn new(active: ActiveTimerCount, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            active,
            notifier,
            ticker: Mutex::new(None),
            interval_minutes: AtomicU64::new(DEFAULT_REMINDER_INTERVAL_MINUTES),
        }
    }

    /// Begin ticking every `interval_minutes`
    pub async fn start(&self, interval_minutes: u64) {
        self.reconfigure(interval_minutes).await;
    }

    /// Replace the ticker with one at the new cadence. Zero falls back to the
    /// default interval. Nothing fires until a full new interval has passed.
    pub async fn reconfigure(&self, interval_minutes: u64) {
        let minutes = effective_interval(interval_minutes);

        let mut ticker = self.ticker.lock().await;
        if let Some(handle) = ticker.take() {
            handle.abort();
        }

        self.interval_minutes.store(minutes, Ordering::SeqCst);
        *ticker = Some(self.spawn_ticker(Duration::from_secs(minutes * 60)));
        drop(ticker);

        log_reminder_rescheduled(minutes);
    }

    /// Cancel the ticker; a later `start` or `reconfigure` resumes it
    pub async fn stop(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
            debug!("Reminder ticker stopped");
        }
    }

    pub fn interval_minutes(&self) -> u64 {
        self.interval_minutes.load(Ordering::SeqCst)
    }

    pub async fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn spawn_ticker(&self, period: Duration) -> JoinHandle<()> {
        let active = self.active.clone();
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let running = active.get();
                if running > 0 {
                    log_reminder_fired(running);
                    notifier.notify(REMINDER_TITLE, REMINDER_BODY).await;
                }
            }
        })
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.get_mut().take() {
            handle.abort();
        }
    }
}

fn effective_interval(minutes: u64) -> u64 {
    if minutes == 0 {
        DEFAULT_REMINDER_INTERVAL_MINUTES
    } else {
        minutes.min(MAX_REMINDER_INTERVAL_MINUTES)
    }
}
