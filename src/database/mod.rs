//! Database abstraction layer
//!
//! SQLite persistence for completed checkups and settings using SQLx.

pub mod checkup_store;
pub mod connection;
pub mod settings_store;
pub mod types;

pub use checkup_store::CheckupStore;
pub use connection::DatabaseManager;
pub use settings_store::SettingsStore;
pub use types::{StoreError, StoreResult};
