//! Event-log retention boundary.
//!
//! The `event_log` table is written by the logging sink, not by an entity
//! repository, so this interface stays narrow: one parameterized raw delete,
//! success/failure only.

use crate::repo::RepoResult;
use rusqlite::Connection;

/// Narrow interface consumed by the scheduled cleanup task.
pub trait EventLogRepository {
    /// Deletes rows with `timestamp` strictly less than the cutoff
    /// (epoch milliseconds). Rows at or after the cutoff are untouched.
    fn delete_logs_older_than(&self, cutoff_epoch_ms: i64) -> RepoResult<()>;
}

/// SQLite-backed event-log repository.
pub struct SqliteEventLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventLogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventLogRepository for SqliteEventLogRepository<'_> {
    fn delete_logs_older_than(&self, cutoff_epoch_ms: i64) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM event_log WHERE timestamp < ?1;",
            [cutoff_epoch_ms],
        )?;
        Ok(())
    }
}
