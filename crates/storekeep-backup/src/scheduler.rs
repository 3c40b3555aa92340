//! Daily auto-backup schedule.
//!
//! The first run happens at the next occurrence of the configured local
//! hour; after that the scheduler sleeps 24 hours between runs. A failed run
//! is logged and does not stop the schedule.

use crate::manager::{BackupCreated, BackupManager};
use camino::Utf8PathBuf;
use chrono::{DateTime, Days, Local, TimeZone};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Interval between scheduled runs after the first one.
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Runs auto-backup once a day.
pub struct DailyScheduler {
    manager: Arc<BackupManager>,
    directory: Utf8PathBuf,
    hour: u32,
    keep_count: usize,
}

impl DailyScheduler {
    pub fn new(
        manager: Arc<BackupManager>,
        directory: impl Into<Utf8PathBuf>,
        hour: u32,
        keep_count: usize,
    ) -> Self {
        Self {
            manager,
            directory: directory.into(),
            hour,
            keep_count,
        }
    }

    /// Runs the schedule until `shutdown` resolves.
    ///
    /// Shutdown is only observed while waiting; a run in progress is
    /// finished first.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut delay = next_run_delay(&Local::now(), self.hour);
        loop {
            info!(
                "Next scheduled backup in {}h {}m (directory={}, keep={})",
                delay.as_secs() / 3600,
                (delay.as_secs() % 3600) / 60,
                self.directory,
                self.keep_count
            );

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Backup scheduler stopped");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            self.run_once().await;
            delay = DAY;
        }
    }

    /// One scheduled auto-backup; errors are logged, not returned.
    pub async fn run_once(&self) -> Option<BackupCreated> {
        info!("Running scheduled backup");
        match self
            .manager
            .auto_backup(&self.directory, self.keep_count)
            .await
        {
            Ok(created) => {
                info!("Scheduled backup completed: {}", created.path);
                Some(created)
            }
            Err(e) => {
                error!("Scheduled backup failed: {}", e);
                None
            }
        }
    }
}

/// Time from `now` until the next `hour`:00 local time, strictly in the future.
///
/// Local times that do not exist (DST gaps) are skipped to the following day.
pub fn next_run_delay<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> Duration {
    let timezone = now.timezone();
    let today = now.date_naive();

    for offset in 0..3 {
        let target = today
            .checked_add_days(Days::new(offset))
            .and_then(|day| day.and_hms_opt(hour, 0, 0))
            .and_then(|naive| timezone.from_local_datetime(&naive).earliest());

        if let Some(target) = target {
            if target > *now {
                if let Ok(delay) = target.signed_duration_since(now).to_std() {
                    return delay;
                }
            }
        }
    }

    DAY
}
