//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Position`] - A cell's location (e.g., "A1")
//! - [`Size`] - The printable extent of a sheet
//! - [`CellValue`] - The value a cell evaluates to
//! - [`FormulaError`] - Evaluation error categories

mod address;
mod value;

pub use address::{Position, Size};
pub use value::{CellValue, FormulaError};
