// Metric Domain Model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::DomainError;

/// Countable property of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metric {
    LineCount,
    WordCount,
    CharacterCount,
    ByteCount,
}

impl Metric {
    /// Every metric, in display order
    pub const ALL: [Metric; 4] = [
        Metric::LineCount,
        Metric::WordCount,
        Metric::CharacterCount,
        Metric::ByteCount,
    ];

    /// Human-readable label (operation selection)
    pub fn label(&self) -> &'static str {
        match self {
            Metric::LineCount => "Count lines",
            Metric::WordCount => "Count words",
            Metric::CharacterCount => "Count characters",
            Metric::ByteCount => "Count bytes",
        }
    }

    /// Short prefix shown in front of a result value
    pub fn result_prefix(&self) -> &'static str {
        match self {
            Metric::LineCount => "Lines: ",
            Metric::WordCount => "Words: ",
            Metric::CharacterCount => "Characters: ",
            Metric::ByteCount => "Bytes: ",
        }
    }

    /// Flag passed to `wc` on POSIX platforms
    pub fn posix_flag(&self) -> &'static str {
        match self {
            Metric::LineCount => "-l",
            Metric::WordCount => "-w",
            Metric::CharacterCount => "-m",
            Metric::ByteCount => "-c",
        }
    }

    /// Short name accepted by [`FromStr`]
    pub fn short_name(&self) -> &'static str {
        match self {
            Metric::LineCount => "lines",
            Metric::WordCount => "words",
            Metric::CharacterCount => "chars",
            Metric::ByteCount => "bytes",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Metric {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lines" | "line" | "l" => Ok(Metric::LineCount),
            "words" | "word" | "w" => Ok(Metric::WordCount),
            "chars" | "characters" | "m" => Ok(Metric::CharacterCount),
            "bytes" | "byte" | "c" => Ok(Metric::ByteCount),
            other => Err(DomainError::InvalidMetric(other.to_string())),
        }
    }
}
