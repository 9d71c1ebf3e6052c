//! clamscan console output parsing
//!
//! The scanner prints one verdict line per file followed by a `SCAN SUMMARY`
//! block of `key: value` lines:
//!
//! ```text
//! /malware/web_abc: Eicar-Test-Signature FOUND
//!
//! ----------- SCAN SUMMARY -----------
//! Known viruses: 8624890
//! Engine version: 0.103.8
//! Scanned files: 1
//! Infected files: 1
//! ```
//!
//! Everything format-specific lives in [`parse`]; [`parse_outcome`] wires it to
//! the subprocess outcome and the persisted update stamp.

use crate::models::{ScanOutcome, ScanResult};
use crate::update_state::UpdateState;

const CLEAN_MARKER: &str = "OK";
const FOUND_MARKER: &str = "FOUND";
const KNOWN_VIRUSES_KEY: &str = "Known viruses";
const ENGINE_VERSION_KEY: &str = "Engine version";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty scan result")]
    EmptyVerdict,

    #[error("verdict line has no `<path>: <verdict>` separator: {0}")]
    MalformedVerdict(String),
}

/// Parse scanner output into a result. `last_updated` is left empty.
pub fn parse(output: &str) -> Result<ScanResult, ParseError> {
    let mut lines = output.lines();
    let verdict_line = lines.next().unwrap_or_default();
    if verdict_line.trim().is_empty() {
        return Err(ParseError::EmptyVerdict);
    }

    // Paths may contain colons, signature names do not.
    let (_, verdict) = verdict_line
        .rsplit_once(':')
        .ok_or_else(|| ParseError::MalformedVerdict(verdict_line.to_string()))?;

    let mut result = ScanResult::default();
    if verdict.contains(CLEAN_MARKER) {
        result.infected = false;
    } else {
        result.infected = true;
        result.result_label = strip_found(verdict);
    }

    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.contains(KNOWN_VIRUSES_KEY) {
            result.known_signature_count = value.trim().to_string();
        } else if key.contains(ENGINE_VERSION_KEY) {
            result.engine_version = value.trim().to_string();
        }
    }

    Ok(result)
}

fn strip_found(verdict: &str) -> String {
    let verdict = verdict.trim();
    verdict
        .strip_suffix(FOUND_MARKER)
        .unwrap_or(verdict)
        .trim()
        .to_string()
}

/// Turn a scanner outcome into the published result.
///
/// Execution errors yield an error-only result. Unparseable output is logged
/// and degrades to the zero value.
pub fn parse_outcome(outcome: &ScanOutcome, update_state: &UpdateState) -> ScanResult {
    let output = match outcome {
        ScanOutcome::ExecutionError(message) => {
            tracing::error!(error = %message, "Scanner execution failed");
            return ScanResult::from_error(message.clone());
        }
        ScanOutcome::Clean(output) | ScanOutcome::Infected(output) => output,
    };

    tracing::debug!(output = %output, "ClamAV output");

    match parse(output) {
        Ok(mut result) => {
            result.last_updated = update_state.read_or_placeholder();
            result
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not parse scanner output");
            ScanResult::default()
        }
    }
}
