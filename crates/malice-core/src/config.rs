//! Configuration module
//!
//! Plugin configuration is read from the environment (and a `.env` file when
//! present). Every setting has a default matching the stock Malice container
//! layout, so an empty environment yields a working configuration.

use std::env;
use std::path::PathBuf;

// Common constants
const CLAMSCAN_PATH: &str = "/usr/bin/clamscan";
const FRESHCLAM_PATH: &str = "freshclam";
const UPDATED_FILE: &str = "/opt/malice/UPDATED";
const UPLOAD_DIR: &str = "/malware";
const SERVER_PORT: u16 = 3992;
const MAX_UPLOAD_SIZE_MB: usize = 100;

/// Plugin configuration
#[derive(Clone, Debug)]
pub struct PluginConfig {
    pub clamscan_path: PathBuf,
    pub freshclam_path: PathBuf,
    /// File holding the last signature update date
    pub updated_file: PathBuf,
    /// Directory receiving uploaded files while they are scanned
    pub upload_dir: PathBuf,
    pub server_port: u16,
    pub max_upload_size_bytes: usize,
    // Malice callback configuration
    pub callback_endpoint: Option<String>,
    pub callback_proxy: Option<String>,
    pub scan_id: Option<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            clamscan_path: CLAMSCAN_PATH.into(),
            freshclam_path: FRESHCLAM_PATH.into(),
            updated_file: UPDATED_FILE.into(),
            upload_dir: UPLOAD_DIR.into(),
            server_port: SERVER_PORT,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            callback_endpoint: None,
            callback_proxy: None,
            scan_id: None,
        }
    }
}

impl PluginConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = match non_empty("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let max_upload_size_mb = non_empty("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        Ok(Self {
            clamscan_path: non_empty("CLAMSCAN_PATH")
                .unwrap_or_else(|| CLAMSCAN_PATH.to_string())
                .into(),
            freshclam_path: non_empty("FRESHCLAM_PATH")
                .unwrap_or_else(|| FRESHCLAM_PATH.to_string())
                .into(),
            updated_file: non_empty("MALICE_UPDATED_FILE")
                .unwrap_or_else(|| UPDATED_FILE.to_string())
                .into(),
            upload_dir: non_empty("MALICE_UPLOAD_DIR")
                .unwrap_or_else(|| UPLOAD_DIR.to_string())
                .into(),
            server_port,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            callback_endpoint: non_empty("MALICE_ENDPOINT"),
            callback_proxy: non_empty("MALICE_PROXY"),
            scan_id: non_empty("MALICE_SCANID"),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if let Some(endpoint) = &self.callback_endpoint {
            require_http_url("MALICE_ENDPOINT", endpoint)?;
        }
        if let Some(proxy) = &self.callback_proxy {
            require_http_url("MALICE_PROXY", proxy)?;
        }
        Ok(())
    }
}

fn require_http_url(name: &str, value: &str) -> Result<(), anyhow::Error> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} must be an http(s) URL, got '{}'",
            name,
            value
        ))
    }
}
