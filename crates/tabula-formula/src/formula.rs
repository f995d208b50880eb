//! Parsed formula handle

use crate::ast::Expr;
use crate::evaluator::{evaluate, CellLookup};
use crate::parser::parse_expression;
use std::fmt;
use std::str::FromStr;
use tabula_core::{Error, FormulaError, Position, Result};

/// A parsed formula expression together with the cells it references
///
/// The reference list is computed once at parse time: in-grid positions
/// only, deduplicated and sorted row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    ast: Expr,
    references: Vec<Position>,
}

impl Formula {
    /// Parse expression text (without the leading `=`)
    ///
    /// Fails with [`Error::FormulaSyntax`] carrying the offending text.
    pub fn parse(expression: &str) -> Result<Self> {
        let ast = parse_expression(expression)
            .map_err(|e| Error::syntax(expression, e.to_string()))?;

        let mut references = Vec::new();
        ast.collect_references(&mut references);
        references.sort_unstable();
        references.dedup();

        Ok(Self { ast, references })
    }

    /// Evaluate against the given cells
    pub fn evaluate(&self, lookup: &dyn CellLookup) -> std::result::Result<f64, FormulaError> {
        evaluate(&self.ast, lookup)
    }

    /// Canonical text of the expression, without the leading `=`
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    /// Referenced in-grid positions, sorted and deduplicated
    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ast)
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabula_core::CellValue;

    fn pos(addr: &str) -> Position {
        Position::parse(addr).unwrap()
    }

    #[test]
    fn test_referenced_cells_sorted_and_deduplicated() {
        let formula = Formula::parse("C1 + A2 * B1 - A2 + C1 + ZZZZ9").unwrap();
        assert_eq!(
            formula.referenced_cells(),
            &[pos("B1"), pos("C1"), pos("A2")]
        );
    }

    #[test]
    fn test_expression_is_canonical() {
        let formula: Formula = "( A1 + 1 ) * (2)".parse().unwrap();
        assert_eq!(formula.expression(), "(A1+1)*2");
        assert_eq!(formula.to_string(), "(A1+1)*2");
    }

    #[test]
    fn test_syntax_error_carries_text() {
        let err = Formula::parse("1 + * 2").unwrap_err();
        match err {
            Error::FormulaSyntax { formula, message } => {
                assert_eq!(formula, "1 + * 2");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_through_lookup() {
        let formula = Formula::parse("A1/B1").unwrap();
        let lookup = |p: Position| -> Option<CellValue> {
            if p == pos("A1") {
                Some(CellValue::Number(9.0))
            } else {
                None
            }
        };
        assert_eq!(formula.evaluate(&lookup), Err(FormulaError::Div0));
    }
}
