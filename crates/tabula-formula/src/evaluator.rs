//! Formula evaluator
//!
//! Evaluates formula ASTs to a number. The first error met anywhere in the
//! tree becomes the whole result.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use tabula_core::{CellValue, FormulaError, Position};

/// Source of cell values for formula evaluation
pub trait CellLookup {
    /// Current value of the cell at `pos`, or `None` if no cell exists there
    fn cell_value(&self, pos: Position) -> Option<CellValue>;
}

impl<F> CellLookup for F
where
    F: Fn(Position) -> Option<CellValue>,
{
    fn cell_value(&self, pos: Position) -> Option<CellValue> {
        self(pos)
    }
}

/// Convert a referenced cell's value to an arithmetic operand
///
/// Empty text reads as zero, and text that is entirely a decimal number
/// reads as that number. Error values propagate unchanged.
pub fn to_number(value: &CellValue) -> Result<f64, FormulaError> {
    match value {
        CellValue::Number(n) => Ok(*n),
        CellValue::Text(s) if s.is_empty() => Ok(0.0),
        CellValue::Text(s) => parse_numeric_text(s).ok_or(FormulaError::Value),
        CellValue::Error(e) => Err(*e),
    }
}

fn parse_numeric_text(s: &str) -> Option<f64> {
    // Rejects words Rust would accept, like "inf" and "NaN"
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn checked(result: f64) -> Result<f64, FormulaError> {
    if result.is_finite() {
        Ok(result)
    } else {
        Err(FormulaError::Div0)
    }
}

/// Evaluate a formula expression
pub fn evaluate(expr: &Expr, lookup: &dyn CellLookup) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(*n),

        Expr::CellRef(pos) => {
            if !pos.is_valid() {
                return Err(FormulaError::Ref);
            }
            match lookup.cell_value(*pos) {
                Some(value) => to_number(&value),
                None => Ok(0.0),
            }
        }

        Expr::OutOfRange(_) => Err(FormulaError::Ref),

        Expr::UnaryOp { op, operand } => {
            let n = evaluate(operand, lookup)?;
            Ok(match op {
                UnaryOperator::Plus => n,
                UnaryOperator::Negate => -n,
            })
        }

        Expr::BinaryOp { op, left, right } => {
            let l = evaluate(left, lookup)?;
            let r = evaluate(right, lookup)?;
            match op {
                BinaryOperator::Add => checked(l + r),
                BinaryOperator::Subtract => checked(l - r),
                BinaryOperator::Multiply => checked(l * r),
                BinaryOperator::Divide => {
                    if r == 0.0 {
                        Err(FormulaError::Div0)
                    } else {
                        checked(l / r)
                    }
                }
            }
        }
    }
}
