//! Subprocess execution with a deadline.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command {program} timed out")]
    TimedOut { program: String },
}

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    /// stdout followed by stderr, lossily decoded
    pub combined: String,
}

impl CommandOutput {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// A program plus the arguments that precede any per-call arguments.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Short program name for messages (`/usr/bin/clamscan` -> `clamscan`).
    pub fn name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Run with `extra` appended to the base arguments. The child is killed if
    /// it outlives `timeout`.
    pub async fn run(
        &self,
        extra: &[&std::ffi::OsStr],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        let start = Instant::now();
        let child = Command::new(&self.program)
            .args(&self.args)
            .args(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: self.name(),
                source,
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(CommandError::Wait {
                    program: self.name(),
                    source,
                })
            }
            Err(_) => {
                // Dropping the wait future drops the child, which kills it.
                tracing::warn!(
                    program = %self.program.display(),
                    timeout_secs = timeout.as_secs_f64(),
                    "Command exceeded its timeout"
                );
                return Err(CommandError::TimedOut {
                    program: self.name(),
                });
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        tracing::debug!(
            program = %self.program.display(),
            status = %output.status,
            duration_ms = start.elapsed().as_millis(),
            "Command finished"
        );

        Ok(CommandOutput {
            status: output.status,
            combined,
        })
    }
}
