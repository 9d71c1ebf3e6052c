use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Result of a single ClamAV scan.
///
/// Field names on the wire follow the Malice plugin convention, so downstream
/// collectors can consume it without a mapping layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanResult {
    pub infected: bool,
    /// Signature name reported for an infected file; empty when clean
    #[serde(rename = "result", default)]
    pub result_label: String,
    #[serde(rename = "engine", default)]
    pub engine_version: String,
    /// Number of signatures loaded by the engine, verbatim from the scanner
    #[serde(rename = "known", default)]
    pub known_signature_count: String,
    /// Date of the last signature update (`YYYYMMDD`)
    #[serde(rename = "updated", default)]
    pub last_updated: String,
    #[serde(default)]
    pub error: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub markdown: String,
}

impl ScanResult {
    /// Result carrying only an execution error.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            ..Self::default()
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Copy of this result with the rendered markdown attached.
    pub fn with_markdown(mut self) -> Self {
        self.markdown = crate::markdown::render_table(&self);
        self
    }

    /// Copy of this result without markdown, as emitted in JSON output.
    pub fn without_markdown(mut self) -> Self {
        self.markdown.clear();
        self
    }
}

/// JSON envelope around a [`ScanResult`]: `{"id": ..., "clamav": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginResults {
    pub id: String,
    #[serde(rename = "clamav")]
    pub data: ScanResult,
}

impl PluginResults {
    pub fn new(id: impl Into<String>, data: ScanResult) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Outcome of running the scanner binary.
///
/// ClamAV exits with status 1 when it finds a virus, so that status is a
/// normal result rather than a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Exit status 0; carries the console output
    Clean(String),
    /// Exit status 1; carries the console output
    Infected(String),
    /// Spawn failure, timeout or any other exit status
    ExecutionError(String),
}

impl Display for ScanOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ScanOutcome::Clean(_) => write!(f, "clean"),
            ScanOutcome::Infected(_) => write!(f, "infected"),
            ScanOutcome::ExecutionError(msg) => write!(f, "error: {}", msg),
        }
    }
}
