//! Error types for tabula-core

use crate::cell::Position;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by edits and lookups.
///
/// Every variant rejects the operation that caused it; the sheet is left in
/// its last committed state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Position lies outside the grid
    #[error("Invalid position: row {}, column {}", .0.row, .0.col)]
    InvalidPosition(Position),

    /// Text is not an A1-style address inside the grid
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Committing the edit would make the reference graph cyclic
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(Position),

    /// Formula text could not be parsed
    #[error("Formula syntax error in '{formula}': {message}")]
    FormulaSyntax { formula: String, message: String },
}

impl Error {
    /// Create a syntax error for the given formula text
    pub fn syntax<F: Into<String>, M: Into<String>>(formula: F, message: M) -> Self {
        Error::FormulaSyntax {
            formula: formula.into(),
            message: message.into(),
        }
    }
}
