//! # tabula
//!
//! A small spreadsheet engine with lazily evaluated, memoized formulas.
//!
//! ## Features
//!
//! - Sparse grid of up to 16384 × 16384 cells addressed by row/column or A1 text
//! - Arithmetic formulas over numbers and cell references
//! - Circular references rejected at edit time; the sheet is left unchanged
//! - Values computed on demand and memoized until an upstream edit
//! - Tab-separated printing of values or texts
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(Position::parse("A1")?, "2")?;
//! sheet.set_cell(Position::parse("A2")?, "=A1*(3+4)")?;
//! sheet.set_cell(Position::parse("B1")?, "'=not a formula")?;
//!
//! let mut out = Vec::new();
//! sheet.print_values(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "2\t=not a formula\n14\t\n");
//! # Ok::<(), tabula::Error>(())
//! ```

pub mod cell;
pub mod prelude;
pub mod sheet;

pub use cell::{Cell, CellKind, ESCAPE_SIGN, FORMULA_SIGN};
pub use sheet::{CellView, Sheet};

// Re-export core types
pub use tabula_core::{
    CellValue, Error, FormulaError, Position, Result, Size, MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use tabula_formula::{CellLookup, Formula};
