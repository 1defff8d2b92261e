// Task Domain Model

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::metric::Metric;

/// Unit of concurrent work: one file measured by one metric
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    pub path: PathBuf,
    pub metric: Metric,
}

impl Task {
    pub fn new(path: impl Into<PathBuf>, metric: Metric) -> Self {
        Self {
            path: path.into(),
            metric,
        }
    }

    /// Final path component, falling back to the whole path
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    pub fn success(&self, value: u64) -> TaskOutcome {
        TaskOutcome::Success {
            file_name: self.file_name(),
            path: self.path.clone(),
            metric: self.metric,
            value,
        }
    }

    pub fn failure(&self, kind: FailureKind, message: impl Into<String>) -> TaskOutcome {
        TaskOutcome::Failure {
            file_name: self.file_name(),
            path: self.path.clone(),
            metric: self.metric,
            kind,
            message: message.into(),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Classification of a failed task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// File missing or is a directory (no process spawned)
    NotFound,
    /// Process exceeded the ceiling and was killed
    Timeout,
    NonZeroExit,
    /// Exit status 0 but nothing printed
    EmptyOutput,
    ParseError,
    /// Executable missing or OS-level failure while launching/reading
    SpawnIo,
    UnsupportedPlatform,
    /// Executor panicked inside its task
    Panicked,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "NOT_FOUND"),
            FailureKind::Timeout => write!(f, "TIMEOUT"),
            FailureKind::NonZeroExit => write!(f, "NON_ZERO_EXIT"),
            FailureKind::EmptyOutput => write!(f, "EMPTY_OUTPUT"),
            FailureKind::ParseError => write!(f, "PARSE_ERROR"),
            FailureKind::SpawnIo => write!(f, "SPAWN_IO"),
            FailureKind::UnsupportedPlatform => write!(f, "UNSUPPORTED_PLATFORM"),
            FailureKind::Panicked => write!(f, "PANICKED"),
        }
    }
}

/// Result of executing one task
///
/// Failures carry a plain message (never an error object) so outcomes can
/// cross task and display boundaries freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    Success {
        file_name: String,
        path: PathBuf,
        metric: Metric,
        value: u64,
    },
    Failure {
        file_name: String,
        path: PathBuf,
        metric: Metric,
        kind: FailureKind,
        message: String,
    },
}

impl TaskOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            TaskOutcome::Success { file_name, .. } | TaskOutcome::Failure { file_name, .. } => {
                file_name
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TaskOutcome::Success { path, .. } | TaskOutcome::Failure { path, .. } => path,
        }
    }

    pub fn metric(&self) -> Metric {
        match self {
            TaskOutcome::Success { metric, .. } | TaskOutcome::Failure { metric, .. } => *metric,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success { .. })
    }

    pub fn value(&self) -> Option<u64> {
        match self {
            TaskOutcome::Success { value, .. } => Some(*value),
            TaskOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            TaskOutcome::Success { .. } => None,
            TaskOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}
