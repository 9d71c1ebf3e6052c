use crate::command::{CommandError, CommandOutput, ExternalCommand};
use malice_core::{parse_outcome, PluginConfig, ScanOutcome, ScanResult, UpdateState};
use std::path::Path;
use std::time::{Duration, Instant};

/// clamscan exit status when at least one virus was found.
const VIRUS_FOUND_EXIT_CODE: i32 = 1;

/// Runs the ClamAV command-line tools.
#[derive(Debug, Clone)]
pub struct ClamAVService {
    scanner: ExternalCommand,
    updater: ExternalCommand,
    update_state: UpdateState,
}

impl ClamAVService {
    /// Create a new ClamAVService.
    ///
    /// # Arguments
    /// * `clamscan` - Path to the `clamscan` binary, invoked as `clamscan --stdout <file>`
    /// * `freshclam` - Path to the signature updater, invoked without arguments
    /// * `update_state` - Stamp file read into results and written after updates
    pub fn new(
        clamscan: impl AsRef<Path>,
        freshclam: impl AsRef<Path>,
        update_state: UpdateState,
    ) -> Self {
        Self::with_commands(
            ExternalCommand::new(clamscan.as_ref()).arg("--stdout"),
            ExternalCommand::new(freshclam.as_ref()),
            update_state,
        )
    }

    /// Create with explicit commands. The file to scan is appended to the
    /// scanner's arguments.
    pub fn with_commands(
        scanner: ExternalCommand,
        updater: ExternalCommand,
        update_state: UpdateState,
    ) -> Self {
        Self {
            scanner,
            updater,
            update_state,
        }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(
            &config.clamscan_path,
            &config.freshclam_path,
            UpdateState::new(&config.updated_file),
        )
    }

    pub fn update_state(&self) -> &UpdateState {
        &self.update_state
    }

    /// Scan `path` and return the parsed result. Failures end up in
    /// `ScanResult::error`.
    pub async fn scan(&self, path: &Path, timeout: Duration) -> ScanResult {
        let start = Instant::now();
        tracing::debug!(path = %path.display(), "Starting ClamAV scan");

        let outcome = self.run_scanner(path, timeout).await;
        let result = parse_outcome(&outcome, &self.update_state);

        if result.infected {
            tracing::warn!(
                path = %path.display(),
                duration_ms = start.elapsed().as_millis(),
                virus = %result.result_label,
                "File scan detected virus"
            );
        } else {
            tracing::info!(
                path = %path.display(),
                duration_ms = start.elapsed().as_millis(),
                outcome = %outcome,
                "File scan completed"
            );
        }
        result
    }

    /// Run the scanner and classify how it finished.
    pub async fn run_scanner(&self, path: &Path, timeout: Duration) -> ScanOutcome {
        let result = self.scanner.run(&[path.as_os_str()], timeout).await;
        classify_scan(&self.scanner, result)
    }

    /// Refresh virus signatures, then stamp today's date.
    ///
    /// A failing updater is logged and does not prevent the stamp from being
    /// written; only a failure to write the stamp is returned.
    pub async fn update(&self, timeout: Duration) -> anyhow::Result<()> {
        tracing::info!(program = %self.updater.program().display(), "Updating ClamAV signatures");

        match self.updater.run(&[], timeout).await {
            Ok(output) if output.status.success() => {
                tracing::info!(output = %output.combined, "Finished updating virus signatures");
            }
            Ok(output) => {
                tracing::warn!(
                    status = %output.status,
                    output = %output.combined,
                    "Signature updater exited unsuccessfully"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Signature updater could not complete");
            }
        }

        self.update_state.record_today()
    }
}

fn classify_scan(
    scanner: &ExternalCommand,
    result: Result<CommandOutput, CommandError>,
) -> ScanOutcome {
    match result {
        Ok(output) if output.status.success() => ScanOutcome::Clean(output.combined),
        Ok(output) if output.code() == Some(VIRUS_FOUND_EXIT_CODE) => {
            ScanOutcome::Infected(output.combined)
        }
        Ok(output) => {
            tracing::debug!(output = %output.combined, "Scanner failed");
            ScanOutcome::ExecutionError(format!(
                "command {} failed with {}",
                scanner.name(),
                output.status
            ))
        }
        Err(e) => ScanOutcome::ExecutionError(e.to_string()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use malice_core::update_state::UNREADABLE_PLACEHOLDER;
    use tempfile::TempDir;

    const EICAR_SCRIPT: &str = "printf '%s: Eicar-Test-Signature FOUND\\n\\n----------- SCAN SUMMARY -----------\\nKnown viruses: 8624890\\nEngine version: 0.103.8\\n' \"$0\"; exit 1";
    const CLEAN_SCRIPT: &str =
        "printf '%s: OK\\n\\nKnown viruses: 8624890\\nEngine version: 0.103.8\\n' \"$0\"";

    fn service(dir: &TempDir, scan_script: &str, update_script: &str) -> ClamAVService {
        ClamAVService::with_commands(
            ExternalCommand::new("sh").arg("-c").arg(scan_script),
            ExternalCommand::new("sh").arg("-c").arg(update_script),
            UpdateState::new(dir.path().join("UPDATED")),
        )
    }

    #[tokio::test]
    async fn detection_exit_code_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("UPDATED"), "20240101").unwrap();
        let svc = service(&dir, EICAR_SCRIPT, "true");

        let result = svc
            .scan(Path::new("/malware/web_1"), Duration::from_secs(5))
            .await;
        assert!(result.infected);
        assert_eq!(result.result_label, "Eicar-Test-Signature");
        assert_eq!(result.known_signature_count, "8624890");
        assert_eq!(result.engine_version, "0.103.8");
        assert_eq!(result.last_updated, "20240101");
        assert!(result.error.is_empty());
    }

    #[tokio::test]
    async fn clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, CLEAN_SCRIPT, "true");

        let outcome = svc
            .run_scanner(Path::new("/tmp/x"), Duration::from_secs(5))
            .await;
        assert!(matches!(outcome, ScanOutcome::Clean(_)));

        let result = svc.scan(Path::new("/tmp/x"), Duration::from_secs(5)).await;
        assert!(!result.infected);
        assert!(result.result_label.is_empty());
        assert_eq!(result.last_updated, UNREADABLE_PLACEHOLDER);
    }

    #[tokio::test]
    async fn other_exit_codes_become_error_field() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, "echo 'LibClamAV Error: cl_load(): No such file'; exit 2", "true");

        let result = svc.scan(Path::new("/tmp/x"), Duration::from_secs(5)).await;
        assert!(result.error.starts_with("command sh failed with"));
        assert!(!result.infected);
        assert!(result.last_updated.is_empty());
    }

    #[tokio::test]
    async fn timeout_becomes_error_field() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, "sleep 10", "true");

        let result = svc
            .scan(Path::new("/tmp/x"), Duration::from_millis(200))
            .await;
        assert_eq!(result, ScanResult::from_error("command sh timed out"));
    }

    #[tokio::test]
    async fn missing_scanner_becomes_error_field() {
        let dir = tempfile::tempdir().unwrap();
        let svc = ClamAVService::new(
            "/nonexistent/clamscan",
            "/nonexistent/freshclam",
            UpdateState::new(dir.path().join("UPDATED")),
        );

        let result = svc.scan(Path::new("/tmp/x"), Duration::from_secs(1)).await;
        assert!(result.error.contains("failed to run clamscan"));
    }

    #[tokio::test]
    async fn update_records_todays_date() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, CLEAN_SCRIPT, "true");

        svc.update(Duration::from_secs(5)).await.unwrap();
        let stamp = svc.update_state().read().unwrap();
        assert_eq!(stamp.len(), 8);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn update_twice_keeps_the_later_date() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("UPDATED"), "19991231").unwrap();
        let svc = service(&dir, CLEAN_SCRIPT, "true");

        svc.update(Duration::from_secs(5)).await.unwrap();
        let first = svc.update_state().read().unwrap();
        svc.update(Duration::from_secs(5)).await.unwrap();
        let second = svc.update_state().read().unwrap();

        assert!(second >= first);
        assert!(second.as_str() > "19991231");
    }

    #[tokio::test]
    async fn failing_updater_still_writes_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, CLEAN_SCRIPT, "exit 1");

        svc.update(Duration::from_secs(5)).await.unwrap();
        assert!(svc.update_state().read().is_ok());
    }

    #[tokio::test]
    async fn unwritable_stamp_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let svc = ClamAVService::with_commands(
            ExternalCommand::new("sh").arg("-c").arg(CLEAN_SCRIPT),
            ExternalCommand::new("true"),
            UpdateState::new(blocker.join("UPDATED")),
        );

        assert!(svc.update(Duration::from_secs(5)).await.is_err());
    }
}
