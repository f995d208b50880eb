//! Sheet cells
//!
//! A [`Cell`] stores what the user typed, how it was interpreted, and the
//! last value it evaluated to.

use std::cell::RefCell;

use tabula_core::{CellValue, Position, Result};
use tabula_formula::{CellLookup, Formula};

/// Leading character that marks formula text
pub const FORMULA_SIGN: char = '=';

/// Leading character that forces the rest of the text to be literal
pub const ESCAPE_SIGN: char = '\'';

/// How a cell's text was interpreted
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellKind {
    /// No text
    #[default]
    Empty,
    /// Literal text, stored verbatim (escape sign included)
    Text(String),
    /// Parsed formula
    Formula(Formula),
}

impl CellKind {
    /// Classify raw input text, parsing it if it is a formula
    pub fn classify(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(CellKind::Empty);
        }

        match text.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                Formula::parse(expression).map(CellKind::Formula)
            }
            _ => Ok(CellKind::Text(text.to_string())),
        }
    }
}

/// One grid entry
///
/// The memoized value sits behind a `RefCell` so reads through `&self` can
/// fill it; an empty cache means the value must be recomputed.
#[derive(Debug, Default)]
pub struct Cell {
    kind: CellKind,
    cache: RefCell<Option<CellValue>>,
}

impl Cell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell from raw input text
    pub fn from_text(text: &str) -> Result<Self> {
        Ok(Self {
            kind: CellKind::classify(text)?,
            cache: RefCell::new(None),
        })
    }

    /// Reinterpret the cell from new raw input text
    ///
    /// On a formula syntax error the cell keeps its previous contents.
    pub fn set(&mut self, text: &str) -> Result<()> {
        self.kind = CellKind::classify(text)?;
        self.invalidate();
        Ok(())
    }

    /// Reset to an empty cell
    pub fn clear(&mut self) {
        self.kind = CellKind::Empty;
        self.invalidate();
    }

    /// How the text was interpreted
    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    /// Check whether the cell has no text
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, CellKind::Empty)
    }

    /// Text as shown in an edit view
    ///
    /// Formulas are rendered in canonical form, which may differ from what
    /// was typed in whitespace and parentheses.
    pub fn text(&self) -> String {
        match &self.kind {
            CellKind::Empty => String::new(),
            CellKind::Text(text) => text.clone(),
            CellKind::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// Positions this cell's formula references, sorted and deduplicated
    pub fn referenced_cells(&self) -> &[Position] {
        match &self.kind {
            CellKind::Formula(formula) => formula.referenced_cells(),
            CellKind::Empty | CellKind::Text(_) => &[],
        }
    }

    /// Current value, recomputed only if the cache was invalidated
    pub fn value(&self, lookup: &dyn CellLookup) -> CellValue {
        let cached = self.cache.borrow().clone();
        if let Some(value) = cached {
            return value;
        }

        let value = self.compute(lookup);
        *self.cache.borrow_mut() = Some(value.clone());
        value
    }

    /// Check whether the memoized value can be reused
    pub fn is_cached(&self) -> bool {
        self.cache.borrow().is_some()
    }

    /// Drop the memoized value; returns whether one was present
    pub(crate) fn invalidate(&self) -> bool {
        self.cache.borrow_mut().take().is_some()
    }

    fn compute(&self, lookup: &dyn CellLookup) -> CellValue {
        match &self.kind {
            CellKind::Empty => CellValue::empty(),
            CellKind::Text(text) => {
                CellValue::text(text.strip_prefix(ESCAPE_SIGN).unwrap_or(text))
            }
            CellKind::Formula(formula) => formula.evaluate(lookup).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{Error, FormulaError};

    fn no_cells(_: Position) -> Option<CellValue> {
        None
    }

    #[test]
    fn test_classify() {
        assert_eq!(CellKind::classify("").unwrap(), CellKind::Empty);
        assert_eq!(CellKind::classify("=").unwrap(), CellKind::Text("=".into()));
        assert_eq!(CellKind::classify("hi").unwrap(), CellKind::Text("hi".into()));
        assert!(matches!(CellKind::classify("=1+2").unwrap(), CellKind::Formula(_)));
        assert!(matches!(
            CellKind::classify("=1+"),
            Err(Error::FormulaSyntax { .. })
        ));
    }

    #[test]
    fn test_escape_sign_only_affects_value() {
        let cell = Cell::from_text("'=1+2").unwrap();
        assert_eq!(cell.text(), "'=1+2");
        assert_eq!(cell.value(&no_cells), CellValue::text("=1+2"));

        // Only the first apostrophe is an escape
        let cell = Cell::from_text("''x").unwrap();
        assert_eq!(cell.value(&no_cells), CellValue::text("'x"));
    }

    #[test]
    fn test_formula_text_is_canonical() {
        let cell = Cell::from_text("= (1 + 2) * 3").unwrap();
        assert_eq!(cell.text(), "=(1+2)*3");
        assert_eq!(cell.value(&no_cells), CellValue::Number(9.0));
    }

    #[test]
    fn test_failed_set_keeps_previous_state() {
        let mut cell = Cell::from_text("=A1+B1").unwrap();
        assert!(cell.set("=A1+").is_err());
        assert_eq!(cell.text(), "=A1+B1");
        assert_eq!(cell.referenced_cells().len(), 2);
    }

    #[test]
    fn test_value_is_memoized_until_set() {
        let mut cell = Cell::from_text("=1/0").unwrap();
        assert!(!cell.is_cached());
        assert_eq!(cell.value(&no_cells), CellValue::Error(FormulaError::Div0));
        assert!(cell.is_cached());

        cell.set("7").unwrap();
        assert!(!cell.is_cached());
        assert_eq!(cell.value(&no_cells), CellValue::text("7"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cell = Cell::from_text("=A1").unwrap();
        cell.clear();
        cell.clear();
        assert!(cell.is_empty());
        assert_eq!(cell.text(), "");
        assert!(cell.referenced_cells().is_empty());
        assert_eq!(cell.value(&no_cells), CellValue::empty());
    }
}
