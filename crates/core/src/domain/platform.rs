// Platform Domain Model

use serde::{Deserialize, Serialize};

/// Operating-system category used to select command syntax
///
/// Resolved once per process from an opaque identifier (see [`Platform::resolve`]).
/// `Unsupported` is a terminal sentinel: the orchestrator refuses to schedule
/// any work against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Unsupported,
}

impl Platform {
    /// Map a platform identifier to a variant
    ///
    /// Matching is case-insensitive and substring based, checked in order:
    /// `win` -> Windows, `mac` -> MacOs, `nux`/`lin` -> Linux.
    /// Anything else is `Unsupported` (a valid result, not an error).
    pub fn resolve(identifier: &str) -> Self {
        let id = identifier.to_lowercase();

        if id.contains("win") {
            Platform::Windows
        } else if id.contains("mac") {
            Platform::MacOs
        } else if id.contains("nux") || id.contains("lin") {
            Platform::Linux
        } else {
            Platform::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unsupported)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Windows => write!(f, "WINDOWS"),
            Platform::Linux => write!(f, "LINUX"),
            Platform::MacOs => write!(f, "MACOS"),
            Platform::Unsupported => write!(f, "UNSUPPORTED"),
        }
    }
}
