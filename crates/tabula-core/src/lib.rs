//! # tabula-core
//!
//! Core data types for the tabula spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout tabula:
//! - [`Position`] and [`Size`] - Grid coordinates and printable extents
//! - [`CellValue`] - What a cell evaluates to (text, number or error)
//! - [`FormulaError`] - Evaluation error categories with stable display text
//! - [`Error`] - Edit-time failures (bad position, cycles, syntax errors)
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{CellValue, FormulaError, Position};
//!
//! let pos = Position::parse("C5").unwrap();
//! assert_eq!(pos, Position::new(4, 2));
//! assert_eq!(pos.to_string(), "C5");
//!
//! assert_eq!(CellValue::Number(10.0).to_string(), "10");
//! assert_eq!(CellValue::Error(FormulaError::Div0).to_string(), "#ARITHM!");
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{CellValue, FormulaError, Position, Size};
pub use error::{Error, Result};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 16_384;

/// Maximum number of columns in a sheet
pub const MAX_COLS: u16 = 16_384;
