// Measuring executor
// Runs one task: precheck -> build -> spawn with timeout -> classify output

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::application::command_builder::{self, BuildError};
use crate::application::orchestrator::constants::TASK_TIMEOUT;
use crate::domain::{FailureKind, Platform, Task, TaskOutcome};
use crate::port::{ProcessOutput, ProcessRunner, TaskExecutor};

/// Task executor backed by the host's counting tool
///
/// Every code path ends in exactly one `TaskOutcome`; runner errors,
/// timeouts and malformed output are all converted to `Failure`.
pub struct MeasuringExecutor {
    runner: Arc<dyn ProcessRunner>,
    timeout: Duration,
}

impl MeasuringExecutor {
    /// Create an executor with the default ceiling ([`TASK_TIMEOUT`])
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            timeout: TASK_TIMEOUT,
        }
    }

    /// Override the ceiling (tests use short values)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Reject missing paths and directories before anything is spawned
    async fn precheck(task: &Task) -> Result<PathBuf, TaskOutcome> {
        match tokio::fs::metadata(&task.path).await {
            Ok(meta) if meta.is_dir() => Err(task.failure(FailureKind::NotFound, "is a directory")),
            Ok(_) => absolute_path(&task.path).map_err(|e| {
                task.failure(
                    FailureKind::SpawnIo,
                    format!("cannot resolve absolute path: {}", e),
                )
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(task.failure(FailureKind::NotFound, "file not found"))
            }
            Err(e) => Err(task.failure(
                FailureKind::SpawnIo,
                format!("cannot access file: {}", e),
            )),
        }
    }
}

#[async_trait]
impl TaskExecutor for MeasuringExecutor {
    async fn execute(&self, task: &Task, platform: Platform) -> TaskOutcome {
        let path = match Self::precheck(task).await {
            Ok(p) => p,
            Err(outcome) => {
                warn!(file = %task.path.display(), metric = %task.metric, "Precheck failed");
                return outcome;
            }
        };

        let invocation = match command_builder::build(platform, task.metric, &path.to_string_lossy()) {
            Ok(inv) => inv,
            Err(BuildError::UnsupportedPlatform(p)) => {
                return task.failure(
                    FailureKind::UnsupportedPlatform,
                    format!("unsupported platform: {}", p),
                );
            }
        };

        debug!(command = %invocation, "Spawning measurement process");

        // Dropping the runner future on timeout kills the child
        let outcome = match timeout(self.timeout, self.runner.run(&invocation)).await {
            Ok(Ok(output)) => classify(task, &output),
            Ok(Err(e)) => task.failure(FailureKind::SpawnIo, e.to_string()),
            Err(_) => task.failure(
                FailureKind::Timeout,
                format!("timed out after {:?}", self.timeout),
            ),
        };

        match &outcome {
            TaskOutcome::Success { value, .. } => {
                info!(file = %task.path.display(), metric = %task.metric, value, "Task succeeded")
            }
            TaskOutcome::Failure { kind, message, .. } => {
                warn!(file = %task.path.display(), metric = %task.metric, kind = %kind, error = %message, "Task failed")
            }
        }

        outcome
    }
}

/// Classify a finished process into an outcome
pub fn classify(task: &Task, output: &ProcessOutput) -> TaskOutcome {
    let combined = output.combined();
    let trimmed = combined.trim();

    if !output.success {
        let status = match output.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        };
        return task.failure(
            FailureKind::NonZeroExit,
            format!("command failed with {}: {}", status, trimmed),
        );
    }

    if trimmed.is_empty() {
        return task.failure(FailureKind::EmptyOutput, "command produced no output");
    }

    match parse_count(trimmed) {
        Some(value) => task.success(value),
        None => task.failure(
            FailureKind::ParseError,
            format!("could not parse a count from output: '{}'", trimmed),
        ),
    }
}

/// First whitespace-delimited token of the first line, as a non-negative integer
pub fn parse_count(output: &str) -> Option<u64> {
    output
        .trim()
        .lines()
        .next()?
        .split_whitespace()
        .next()?
        .parse::<u64>()
        .ok()
}

fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
