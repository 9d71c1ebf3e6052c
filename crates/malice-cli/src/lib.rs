//! Scan-and-report logic behind the `malice-clamav` binary.

use anyhow::{bail, Context};
use malice_core::{PluginConfig, PluginResults, ScanResult};
use malice_services::{sha256_file, CallbackClient, ClamAVService};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How a scan result leaves the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Print the markdown table instead of JSON
    pub table: bool,
    /// POST the JSON to `MALICE_ENDPOINT` instead of printing it
    pub callback: bool,
    /// Route the callback through `MALICE_PROXY`
    pub proxy: bool,
}

/// Initialize tracing for the CLI. Logs go to stderr; stdout carries results.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

/// Make `path` absolute and check that it exists.
pub fn resolve_scan_path(path: &Path) -> anyhow::Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(path)
    };
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    Ok(path)
}

pub fn render_table(result: ScanResult) -> String {
    result.with_markdown().markdown
}

/// Serialize the result envelope. Markdown is never part of the JSON output.
pub fn render_json(id: &str, result: ScanResult) -> anyhow::Result<String> {
    serde_json::to_string(&PluginResults::new(id, result.without_markdown()))
        .context("Failed to serialize scan results")
}

/// Scan identifier: `MALICE_SCANID` when set, otherwise the file's SHA-256.
pub async fn scan_id(config: &PluginConfig, path: &Path) -> anyhow::Result<String> {
    match &config.scan_id {
        Some(id) => Ok(id.clone()),
        None => sha256_file(path).await,
    }
}

/// Scan `path` and emit the result as `options` asks.
///
/// Returns what should be printed to stdout.
pub async fn run_scan(
    config: &PluginConfig,
    path: &Path,
    options: ScanOptions,
    timeout: Duration,
) -> anyhow::Result<String> {
    let path = resolve_scan_path(path)?;
    let clamav = ClamAVService::from_config(config);
    let result = clamav.scan(&path, timeout).await;

    if options.table {
        return Ok(render_table(result));
    }

    let id = scan_id(config, &path).await?;
    if !options.callback {
        return render_json(&id, result);
    }

    let endpoint = config
        .callback_endpoint
        .as_deref()
        .context("MALICE_ENDPOINT must be set to post results")?;
    let proxy = if options.proxy {
        Some(
            config
                .callback_proxy
                .as_deref()
                .context("MALICE_PROXY must be set to post through a proxy")?,
        )
    } else {
        None
    };

    let client = CallbackClient::new(endpoint, proxy)?;
    let response = client
        .send(&id, &PluginResults::new(id.clone(), result.without_markdown()))
        .await?;
    Ok(response.body)
}
