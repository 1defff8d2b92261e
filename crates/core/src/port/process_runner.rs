// Process Runner Port
// Abstraction over spawning one external command and collecting its output

use crate::domain::Invocation;
use async_trait::async_trait;
use thiserror::Error;

/// Captured output of a finished process
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ProcessOutput {
    /// Combined text: stdout followed by stderr
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => {
                let mut out = self.stdout.clone();
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&self.stderr);
                out
            }
        }
    }
}

/// Process runner errors
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Process Runner trait
///
/// Implementations:
/// - TokioProcessRunner (infra-system): spawns a real child process
/// - MockProcessRunner: scripted output for tests
///
/// Dropping the future returned by [`ProcessRunner::run`] before it resolves
/// must forcibly terminate the child. Callers rely on this to enforce
/// their timeout.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run an invocation to completion and capture stdout and stderr
    ///
    /// # Errors
    /// - RunError::SpawnFailed if the program cannot be started
    /// - RunError::IoError if waiting or reading output fails
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, RunError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with the given code and output
        Output {
            exit_code: i32,
            stdout: String,
            stderr: String,
        },
        /// Never finish (simulates a hung process)
        Hang,
        /// Fail to spawn with message
        SpawnError(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    impl MockBehavior {
        pub fn stdout(text: impl Into<String>) -> Self {
            MockBehavior::Output {
                exit_code: 0,
                stdout: text.into(),
                stderr: String::new(),
            }
        }

        pub fn exit(exit_code: i32, stderr: impl Into<String>) -> Self {
            MockBehavior::Output {
                exit_code,
                stdout: String::new(),
                stderr: stderr.into(),
            }
        }
    }

    /// Mock Process Runner for testing
    ///
    /// Counts spawns and records every invocation it receives. Overrides
    /// select a behavior when any argument contains the given fragment.
    pub struct MockProcessRunner {
        default: MockBehavior,
        overrides: Vec<(String, MockBehavior)>,
        invocations: Arc<Mutex<Vec<Invocation>>>,
    }

    impl MockProcessRunner {
        pub fn new(default: MockBehavior) -> Self {
            Self {
                default,
                overrides: Vec::new(),
                invocations: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn with_override(mut self, arg_fragment: impl Into<String>, behavior: MockBehavior) -> Self {
            self.overrides.push((arg_fragment.into(), behavior));
            self
        }

        pub fn spawn_count(&self) -> usize {
            self.invocations.lock().unwrap().len()
        }

        pub fn invocations(&self) -> Vec<Invocation> {
            self.invocations.lock().unwrap().clone()
        }

        fn behavior_for(&self, invocation: &Invocation) -> MockBehavior {
            self.overrides
                .iter()
                .find(|(fragment, _)| invocation.args.iter().any(|a| a.contains(fragment.as_str())))
                .map(|(_, behavior)| behavior.clone())
                .unwrap_or_else(|| self.default.clone())
        }
    }

    #[async_trait]
    impl ProcessRunner for MockProcessRunner {
        async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, RunError> {
            self.invocations.lock().unwrap().push(invocation.clone());

            match self.behavior_for(invocation) {
                MockBehavior::Output {
                    exit_code,
                    stdout,
                    stderr,
                } => Ok(ProcessOutput {
                    exit_code: Some(exit_code),
                    success: exit_code == 0,
                    stdout,
                    stderr,
                    duration_ms: 1,
                }),
                MockBehavior::Hang => std::future::pending().await,
                MockBehavior::SpawnError(msg) => Err(RunError::SpawnFailed(msg)),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            }
        }
    }
}
