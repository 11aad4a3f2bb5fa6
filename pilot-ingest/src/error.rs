//! Row-level validation errors. A rejected row never reaches the engine.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("line {line}: missing value for '{column}'")]
    MissingField { line: u64, column: &'static str },

    #[error("line {line}: invalid date '{value}'")]
    InvalidDate { line: u64, value: String },

    #[error("line {line}: invalid amount '{value}'")]
    InvalidAmount { line: u64, value: String },

    #[error("line {line}: unknown transaction kind '{value}'")]
    UnknownKind { line: u64, value: String },

    #[error("line {line}: invalid recurring flag '{value}'")]
    InvalidFlag { line: u64, value: String },

    #[error("line {line}: duplicate transaction id '{id}'")]
    DuplicateId { line: u64, id: String },

    #[error("line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}

impl RowError {
    pub fn line(&self) -> u64 {
        match self {
            RowError::MissingField { line, .. }
            | RowError::InvalidDate { line, .. }
            | RowError::InvalidAmount { line, .. }
            | RowError::UnknownKind { line, .. }
            | RowError::InvalidFlag { line, .. }
            | RowError::DuplicateId { line, .. }
            | RowError::Malformed { line, .. } => *line,
        }
    }
}
