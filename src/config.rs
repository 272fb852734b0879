//! Configuration management for Clinic Timer
//!
//! Handles environment variables and application settings.

use chrono_tz::Tz;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

use crate::database::types::{is_memory_url, mask_database_url};
use crate::models::{CategoryError, CategorySet};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Database URL; relative SQLite paths live under `data_dir`
    pub database_url: String,

    /// Data directory for SQLite database
    pub data_dir: PathBuf,

    /// Clinic timezone used for day/week/month boundaries
    pub timezone: Tz,

    /// Valid patient categories
    pub categories: CategorySet,

    /// Reminder webhook; reminders are only logged when unset
    pub webhook_url: Option<Url>,

    /// Environment (development, production)
    pub environment: String,

    /// Log level
    pub log_level: String,

    /// CORS origins (empty means allow all)
    pub cors_origins: Vec<String>,

    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "sqlite:clinic_data.db".to_string(),
            data_dir: PathBuf::from("./data"),
            timezone: Tz::UTC,
            categories: CategorySet::default(),
            webhook_url: None,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            cors_origins: vec![],
            request_timeout: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any `CLINIC_TIMER_*` variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Server configuration
        if let Some(host) = lookup("CLINIC_TIMER_HOST") {
            config.host = host;
        }

        if let Some(port) = lookup("CLINIC_TIMER_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }

        // Storage
        if let Some(database_url) = lookup("CLINIC_TIMER_DATABASE_URL") {
            config.database_url = database_url;
        }

        if let Some(data_dir) = lookup("CLINIC_TIMER_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        // Clinic
        if let Some(timezone) = lookup("CLINIC_TIMER_TIMEZONE") {
            config.timezone = timezone
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(timezone))?;
        }

        if let Some(categories) = lookup("CLINIC_TIMER_CATEGORIES") {
            config.categories = CategorySet::new(
                categories
                    .split(',')
                    .map(str::trim)
                    .filter(|code| !code.is_empty()),
            )?;
        }

        if let Some(webhook_url) = lookup("CLINIC_TIMER_WEBHOOK_URL").filter(|s| !s.trim().is_empty()) {
            config.webhook_url = Some(parse_webhook_url(&webhook_url)?);
        }

        // Environment and logging
        if let Some(environment) = lookup("CLINIC_TIMER_ENVIRONMENT") {
            config.environment = environment;
        }

        if let Some(log_level) = lookup("CLINIC_TIMER_LOG_LEVEL") {
            config.log_level = log_level;
        }

        // CORS origins
        if let Some(cors_origins) = lookup("CLINIC_TIMER_CORS_ORIGINS") {
            config.cors_origins = cors_origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Request timeout
        if let Some(timeout) = lookup("CLINIC_TIMER_REQUEST_TIMEOUT") {
            config.request_timeout = timeout
                .parse()
                .map_err(|_| ConfigError::InvalidRequestTimeout(timeout))?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }

        if self.database_url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidRequestTimeout(
                self.request_timeout.to_string(),
            ));
        }

        Ok(())
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Create data directory if it doesn't exist
    pub fn ensure_data_dir(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| ConfigError::DataDirCreationFailed(e.to_string()))?;
        Ok(())
    }

    /// Database URL with relative SQLite paths placed under the data directory
    pub fn resolved_database_url(&self) -> String {
        if is_memory_url(&self.database_url) {
            return self.database_url.clone();
        }

        match sqlite_path(&self.database_url) {
            Some(path) if path.is_relative() => {
                let rebased = format!("sqlite:{}", self.data_dir.join(path).display());
                match self.database_url.split_once('?') {
                    Some((_, params)) => format!("{rebased}?{params}"),
                    None => rebased,
                }
            }
            _ => self.database_url.clone(),
        }
    }

    /// Log configuration (excluding sensitive data)
    pub fn log_config(&self) {
        let categories: Vec<&str> = self.categories.iter().map(|c| c.as_str()).collect();

        info!("Configuration loaded:");
        info!("  Environment: {}", self.environment);
        info!("  Bind address: {}", self.bind_address());
        info!(
            "  Database URL: {}",
            mask_database_url(&self.resolved_database_url())
        );
        info!("  Data directory: {:?}", self.data_dir);
        info!("  Timezone: {}", self.timezone.name());
        info!("  Categories: {:?}", categories);
        info!(
            "  Reminder webhook: {}",
            if self.webhook_url.is_some() { "configured" } else { "none" }
        );
        info!("  Log level: {}", self.log_level);
        info!("  CORS origins: {:?}", self.cors_origins);
        info!("  Request timeout: {}s", self.request_timeout);
    }
}

/// Filesystem path of a `sqlite:` URL, without query parameters
fn sqlite_path(url: &str) -> Option<&Path> {
    let rest = url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty()).then(|| Path::new(path))
}

fn parse_webhook_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidWebhookUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::InvalidWebhookUrl(raw.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CLINIC_TIMER_PORT: {0}")]
    InvalidPort(String),

    #[error("Invalid CLINIC_TIMER_REQUEST_TIMEOUT: {0}")]
    InvalidRequestTimeout(String),

    #[error("Invalid CLINIC_TIMER_TIMEZONE: {0}")]
    InvalidTimezone(String),

    #[error("Invalid CLINIC_TIMER_CATEGORIES: {0}")]
    InvalidCategories(#[from] CategoryError),

    #[error("Invalid CLINIC_TIMER_WEBHOOK_URL: {0}")]
    InvalidWebhookUrl(String),

    #[error("Empty database URL")]
    EmptyDatabaseUrl,

    #[error("Empty data directory")]
    EmptyDataDir,

    #[error("Data directory creation failed: {0}")]
    DataDirCreationFailed(String),
}
