// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown metric: {0} (expected one of: lines, words, chars, bytes)")]
    InvalidMetric(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
