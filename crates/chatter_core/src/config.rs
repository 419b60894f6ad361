//! Core configuration shape.
//!
//! # Responsibility
//! - Define the serde-deserializable settings the core consumes.
//!
//! Parsing and file/environment layering happen at the process boundary;
//! the core only sees the resulting struct.

use serde::Deserialize;

const DEFAULT_EVENT_LOG_RETENTION_DAYS: u32 = 30;

/// Settings consumed by the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite database file path.
    pub database_path: String,
    /// Log level passed to `init_logging`.
    pub log_level: String,
    /// Absolute log directory passed to `init_logging`.
    pub log_dir: String,
    /// Retention window for the event-log cleanup task.
    pub delete_event_logs_older_than_days: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: "chatter.db".to_string(),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: String::new(),
            delete_event_logs_older_than_days: DEFAULT_EVENT_LOG_RETENTION_DAYS,
        }
    }
}
