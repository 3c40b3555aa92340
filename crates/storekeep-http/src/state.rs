use camino::Utf8PathBuf;
use std::sync::Arc;
use storekeep_backup::BackupManager;

/// Shared state of the backup routes.
#[derive(Clone)]
pub struct ApiState {
    pub manager: Arc<BackupManager>,
    pub backup_dir: Utf8PathBuf,
    pub keep_count: usize,
    /// Requests are refused with 403 while no token is configured
    pub admin_token: Option<Arc<str>>,
}

impl ApiState {
    pub fn new(
        manager: Arc<BackupManager>,
        backup_dir: impl Into<Utf8PathBuf>,
        keep_count: usize,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            manager,
            backup_dir: backup_dir.into(),
            keep_count,
            admin_token: admin_token.map(Arc::from),
        }
    }
}
