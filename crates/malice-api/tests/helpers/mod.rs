//! Test helpers: build the router around a fake scanner.
//!
//! The scanner is an `sh -c` script; the uploaded file path arrives as `$0`.

#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use malice_api::setup::routes;
use malice_api::AppState;
use malice_core::{PluginConfig, UpdateState};
use malice_services::{ClamAVService, ExternalCommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const EICAR_SCANNER: &str = "printf '%s: Eicar-Test-Signature FOUND\\n\\n----------- SCAN SUMMARY -----------\\nKnown viruses: 8624890\\nEngine version: 0.103.8\\n' \"$0\"; exit 1";
pub const CLEAN_SCANNER: &str =
    "printf '%s: OK\\n\\nKnown viruses: 8624890\\nEngine version: 0.103.8\\n' \"$0\"";

pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn root(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Files currently present in the upload directory.
    pub fn upload_dir_entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.upload_dir)
            .expect("read upload dir")
            .map(|e| e.expect("dir entry").path())
            .collect()
    }
}

pub fn setup_test_app(scanner_script: &str) -> TestApp {
    setup_test_app_with_timeout(scanner_script, Duration::from_secs(10))
}

pub fn setup_test_app_with_timeout(scanner_script: &str, timeout: Duration) -> TestApp {
    let (app, temp_dir, upload_dir) = setup_test_router(scanner_script, timeout, 1024 * 1024);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir,
        _temp_dir: temp_dir,
    }
}

/// Router with its scratch directory and upload directory, for tests that
/// drive the service directly instead of through `TestServer`.
pub fn setup_test_router(
    scanner_script: &str,
    timeout: Duration,
    max_upload_size_bytes: usize,
) -> (Router, TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_dir = temp_dir.path().join("malware");
    std::fs::create_dir(&upload_dir).expect("Failed to create upload directory");

    let update_state = UpdateState::new(temp_dir.path().join("UPDATED"));
    std::fs::write(update_state.path(), "20240101").expect("Failed to write update stamp");

    let clamav = ClamAVService::with_commands(
        ExternalCommand::new("sh").arg("-c").arg(scanner_script),
        ExternalCommand::new("true"),
        update_state,
    );
    let state = Arc::new(AppState::new(clamav, &upload_dir).with_scan_timeout(timeout));

    let config = PluginConfig {
        upload_dir: upload_dir.clone(),
        max_upload_size_bytes,
        ..PluginConfig::default()
    };
    (routes::setup_routes(&config, state), temp_dir, upload_dir)
}
