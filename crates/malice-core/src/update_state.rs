//! Persisted signature-update stamp
//!
//! A single `YYYYMMDD` line written after each signature update and read back
//! into every scan result. There is no locking: a concurrent update and scan
//! may race on the file, and the last writer wins.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Value reported as `updated` when the stamp file cannot be read.
pub const UNREADABLE_PLACEHOLDER: &str = "Could not read updated file";

const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone)]
pub struct UpdateState {
    path: PathBuf,
}

impl UpdateState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stamp as stored, without surrounding whitespace.
    pub fn read(&self) -> std::io::Result<String> {
        let data = std::fs::read_to_string(&self.path)?;
        Ok(data.trim().to_string())
    }

    /// Read the stamp, logging failures and substituting a placeholder.
    pub fn read_or_placeholder(&self) -> String {
        match self.read() {
            Ok(date) => date,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed reading signature update stamp"
                );
                UNREADABLE_PLACEHOLDER.to_string()
            }
        }
    }

    /// Overwrite the stamp with `date`, creating the file (and its parent
    /// directory) if needed.
    pub fn record(&self, date: NaiveDate) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory {}", parent.display())
            })?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        file.write_all(format_date(date).as_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), date = %format_date(date), "Recorded signature update");
        Ok(())
    }

    /// Overwrite the stamp with today's local date.
    pub fn record_today(&self) -> anyhow::Result<()> {
        self.record(Local::now().date_naive())
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
