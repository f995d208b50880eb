//! Cell value types

use std::fmt;
use thiserror::Error;

/// The value a cell evaluates to
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Text value (empty text for empty cells)
    Text(String),

    /// Numeric value
    Number(f64),

    /// Evaluation error (#REF!, #VALUE!, #ARITHM!)
    Error(FormulaError),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Empty text, the value of an empty cell
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    /// Check if the value is empty text
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }

    /// Check if the value is an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Get the number, if this is a numeric value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the error, if this is an error value
    pub fn as_error(&self) -> Option<FormulaError> {
        match self {
            CellValue::Error(e) => Some(*e),
            _ => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<FormulaError> for CellValue {
    fn from(e: FormulaError) -> Self {
        CellValue::Error(e)
    }
}

impl From<Result<f64, FormulaError>> for CellValue {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

/// Formula evaluation error categories
///
/// These are values, not failures: a formula that hits one evaluates to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaError {
    /// #REF! - Reference outside the grid or otherwise unresolvable
    #[error("#REF!")]
    Ref,
    /// #VALUE! - Operand cannot be interpreted as a number
    #[error("#VALUE!")]
    Value,
    /// #ARITHM! - Division by zero or non-finite arithmetic result
    #[error("#ARITHM!")]
    Div0,
}

impl FormulaError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Div0 => "#ARITHM!",
        }
    }

    /// Parse a display string back into an error category
    pub fn from_display(s: &str) -> Option<Self> {
        match s {
            "#REF!" => Some(FormulaError::Ref),
            "#VALUE!" => Some(FormulaError::Value),
            "#ARITHM!" => Some(FormulaError::Div0),
            _ => None,
        }
    }
}
