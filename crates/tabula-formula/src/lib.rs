//! # tabula-formula
//!
//! Formula parser and evaluator for tabula.
//!
//! This crate provides:
//! - Formula parsing (text → AST) and canonical printing (AST → text)
//! - Formula evaluation against any [`CellLookup`]
//! - [`Formula`], the parsed-expression handle cells store
//! - [`DependencyGraph`], forward and reverse reference edges between cells
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{CellValue, Position};
//! use tabula_formula::Formula;
//!
//! let formula = Formula::parse("(A1 + 2) * B1").unwrap();
//! assert_eq!(formula.expression(), "(A1+2)*B1");
//! assert_eq!(
//!     formula.referenced_cells(),
//!     &[Position::new(0, 0), Position::new(0, 1)]
//! );
//!
//! let lookup = |pos: Position| (pos.col == 0).then(|| CellValue::Number(3.0));
//! // B1 is absent and reads as zero
//! assert_eq!(formula.evaluate(&lookup), Ok(0.0));
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use dependency::DependencyGraph;
pub use error::{ParseError, ParseResult};
pub use evaluator::{evaluate, to_number, CellLookup};
pub use formula::Formula;
pub use parser::parse_expression;
