//! Event-log retention cleanup task.

use crate::repo::event_log_repo::EventLogRepository;
use crate::repo::{now_epoch_ms, RepoResult};
use log::{error, info};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Deletes event-log rows older than a configured retention window.
///
/// Fire-and-forget with respect to row count: the task reports success or
/// failure only. Invoked by the external scheduler, one run per trigger.
pub struct EventLogCleanupTask<R: EventLogRepository> {
    repo: R,
    retention_days: u32,
}

impl<R: EventLogRepository> EventLogCleanupTask<R> {
    pub fn new(repo: R, retention_days: u32) -> Self {
        Self {
            repo,
            retention_days,
        }
    }

    /// Runs one cleanup pass. Rows with timestamp strictly older than
    /// `now - retention_days` are removed.
    pub fn run(&self) -> RepoResult<()> {
        let cutoff = now_epoch_ms() - i64::from(self.retention_days) * MS_PER_DAY;
        info!(
            "event=event_log_cleanup module=tasks status=start retention_days={} cutoff={cutoff}",
            self.retention_days
        );

        match self.repo.delete_logs_older_than(cutoff) {
            Ok(()) => {
                info!("event=event_log_cleanup module=tasks status=ok");
                Ok(())
            }
            Err(err) => {
                error!("event=event_log_cleanup module=tasks status=error error={err}");
                Err(err)
            }
        }
    }
}
