//! Services module for Clinic Timer
//!
//! Timer lifecycle, period arithmetic, reminders and the facade tying them
//! to the stores.

pub mod clinic_service;
pub mod notifier;
pub mod period_calculator;
pub mod reminder_scheduler;
pub mod time_provider;
pub mod timer_registry;

pub use clinic_service::ClinicService;
pub use notifier::{LogNotifier, MemoryNotifier, Notifier, WebhookNotifier};
pub use period_calculator::PeriodCalculator;
pub use reminder_scheduler::ReminderScheduler;
pub use time_provider::{MockTimeProvider, SystemTimeProvider, TimeProvider};
pub use timer_registry::{ActiveTimerCount, StartOutcome, TimerRegistry};
