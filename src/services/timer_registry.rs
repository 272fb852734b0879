//! Timer Registry
//!
//! In-memory authority over running per-category timers. Each category is
//! either idle (no entry) or running (one entry). Starting a running category
//! and stopping an idle one are defined no-ops, so duplicate signals from a
//! UI are harmless.
//!
//! All map mutations happen under a single short-lived lock. Stopping removes
//! the entry under that lock and persists the session after releasing it, so
//! store I/O never blocks other categories. If persistence fails the timer is
//! put back, which means a successful `stop` always leaves a recorded session.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn, Instrument};

use crate::database::{CheckupStore, StoreResult};
use crate::logging::{log_session_recorded, log_timer_started};
use crate::models::{ActiveTimerView, Category, CompletedSession, RunningTimer};
use crate::services::time_provider::TimeProvider;
use crate::timer_span;

/// Number of running timers, shared with readers such as the reminder
/// scheduler. Never goes below zero.
#[derive(Debug, Clone, Default)]
pub struct ActiveTimerCount(Arc<AtomicUsize>);

impl ActiveTimerCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Decrement, clamping at zero instead of underflowing
    pub fn decrement(&self) -> usize {
        let previous = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                Some(count.saturating_sub(1))
            })
            .unwrap_or(0);
        previous.saturating_sub(1)
    }
}

/// Result of a start request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new timer was created
    Started(RunningTimer),
    /// The category was already running; nothing changed
    AlreadyRunning(RunningTimer),
}

impl StartOutcome {
    pub fn timer(&self) -> &RunningTimer {
        match self {
            StartOutcome::Started(timer) | StartOutcome::AlreadyRunning(timer) => timer,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, StartOutcome::Started(_))
    }
}

/// Registry of running checkup timers
pub struct TimerRegistry {
    timers: Mutex<HashMap<Category, RunningTimer>>,
    active: ActiveTimerCount,
    store: CheckupStore,
    time_provider: Arc<dyn TimeProvider>,
}

impl TimerRegistry {
    pub fn new(store: CheckupStore, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            timers: Mutex::new(HashMap::new()),
            active: ActiveTimerCount::new(),
            store,
            time_provider,
        }
    }

    /// Start timing `category` unless it is already running
    pub async fn start(&self, category: Category) -> StartOutcome {
        let mut timers = self.timers.lock().await;

        if let Some(existing) = timers.get(&category) {
            debug!("Timer already running for category {}", category);
            return StartOutcome::AlreadyRunning(existing.clone());
        }

        let timer = RunningTimer::new(category.clone(), self.time_provider.now_timestamp_millis());
        timers.insert(category, timer.clone());
        let active = self.active.increment();
        drop(timers);

        log_timer_started(timer.category.as_str(), timer.started_at, active);
        StartOutcome::Started(timer)
    }

    /// Stop timing `category` and persist the finished session.
    ///
    /// Returns `Ok(None)` when the category is not running. Store errors are
    /// returned unchanged and leave the timer running.
    pub async fn stop(&self, category: &Category) -> StoreResult<Option<CompletedSession>> {
        let (timer, ended_at) = {
            let mut timers = self.timers.lock().await;
            let ended_at = self.time_provider.now_timestamp_millis();
            match timers.remove(category) {
                Some(timer) => (timer, ended_at),
                None => {
                    debug!("No active timer found for category {}", category);
                    return Ok(None);
                }
            }
        };

        let persisted = self
            .store
            .insert(&timer.finish(ended_at))
            .instrument(timer_span!("stop", category))
            .await;

        match persisted {
            Ok(session) => {
                let active = self.active.decrement();
                log_session_recorded(&session, active);
                Ok(Some(session))
            }
            Err(error) => {
                let mut timers = self.timers.lock().await;
                match timers.entry(category.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(timer);
                    }
                    // A new timer started while persisting; the old one is gone
                    Entry::Occupied(_) => {
                        self.active.decrement();
                    }
                }
                warn!(
                    category = %category,
                    error = %error,
                    "Failed to record stopped checkup"
                );
                Err(error)
            }
        }
    }

    /// Running timers with elapsed time, ordered by category
    pub async fn active_timers(&self) -> Vec<ActiveTimerView> {
        let now = self.time_provider.now_timestamp_millis();
        let timers = self.timers.lock().await;

        let mut views: Vec<ActiveTimerView> = timers
            .values()
            .map(|timer| ActiveTimerView::at(timer, now))
            .collect();
        views.sort_by(|a, b| a.category.cmp(&b.category));
        views
    }

    pub fn active_count(&self) -> usize {
        self.active.get()
    }

    /// Handle on the active-timer count for read-only observers
    pub fn active_counter(&self) -> ActiveTimerCount {
        self.active.clone()
    }
}
