//! Clinic Timer
//!
//! Per-category checkup stopwatches with durable session history, duration
//! analytics over day/week/month windows and periodic reminders while any
//! timer runs.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use config::{Config, ConfigError};
pub use error::{AppError, AppResult};
