//! Application state shared by request handlers.

use malice_core::PluginConfig;
use malice_services::ClamAVService;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::UPLOAD_SCAN_TIMEOUT_SECS;

/// Immutable per-process state. Requests share nothing mutable except the
/// signature-update stamp on disk.
#[derive(Clone, Debug)]
pub struct AppState {
    pub clamav: ClamAVService,
    /// Directory receiving uploaded samples while they are scanned
    pub upload_dir: PathBuf,
    pub scan_timeout: Duration,
}

impl AppState {
    pub fn new(clamav: ClamAVService, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            clamav,
            upload_dir: upload_dir.into(),
            scan_timeout: Duration::from_secs(UPLOAD_SCAN_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(ClamAVService::from_config(config), &config.upload_dir)
    }

    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }
}
