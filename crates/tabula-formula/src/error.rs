//! Formula parse error types

use thiserror::Error;

/// Result type for formula parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing formula text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Formula has no expression after '='
    #[error("Empty formula")]
    Empty,

    /// Character that cannot start any token
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    /// Token that does not fit the grammar at this point
    #[error("Unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
    },

    /// Malformed numeric literal
    #[error("Invalid number literal '{0}'")]
    InvalidNumber(String),

    /// Letters that are not followed by a row number
    #[error("Invalid cell reference '{0}'")]
    InvalidReference(String),
}
