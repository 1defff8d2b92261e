// Process runner implementation
// reason: tokio::process for async child management with kill-on-drop
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

use tally_core::domain::Invocation;
use tally_core::port::process_runner::{ProcessOutput, ProcessRunner, RunError};

/// Spawns the invocation as a real child process
///
/// stdout and stderr are both piped and captured. The child inherits the
/// parent environment plus the invocation's `env` entries. It is created with
/// `kill_on_drop`, so when a caller abandons the returned future (e.g. on
/// timeout) the process is forcibly killed.
#[derive(Debug, Default, Clone)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, RunError> {
        let start = Instant::now();

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RunError::SpawnFailed(format!("{}: {}", invocation.program, e)))?;

        debug!(pid = ?child.id(), program = %invocation.program, "Child process spawned");

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| RunError::IoError(e.to_string()))?;

        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            program = %invocation.program,
            duration_ms = %duration_ms,
            exit_code = ?output.status.code(),
            "Child process completed"
        );

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms,
        })
    }
}
