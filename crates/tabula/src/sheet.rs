//! Sheet: cell storage, edit validation and grid output
//!
//! # Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(Position::parse("A1")?, "5")?;
//! sheet.set_cell(Position::parse("B1")?, "=A1*2")?;
//!
//! let b1 = sheet.get_cell(Position::parse("B1")?)?.unwrap();
//! assert_eq!(b1.value(), CellValue::Number(10.0));
//!
//! // A1 -> B1 -> A1 is rejected and nothing changes
//! let err = sheet.set_cell(Position::parse("A1")?, "=B1").unwrap_err();
//! assert!(matches!(err, Error::CircularDependency(_)));
//! assert_eq!(sheet.get_cell(Position::parse("A1")?)?.unwrap().text(), "5");
//! # Ok::<(), tabula::Error>(())
//! ```

use std::cell::Cell as Counter;
use std::io::{self, Write};

use ahash::{AHashMap, AHashSet};
use log::{debug, trace};
use tabula_core::{CellValue, Error, Position, Result, Size};
use tabula_formula::{CellLookup, DependencyGraph};

use crate::cell::{Cell, CellKind};

/// A sparse grid of cells
///
/// The sheet owns every cell and the reference graph between them. Every
/// committed state has an acyclic graph; edits that would break this are
/// rejected before anything is modified.
///
/// Values are computed lazily and memoized per cell. An edit discards the
/// memoized values of the edited cell and of everything that transitively
/// depends on it; nothing is recomputed until it is read.
#[derive(Debug, Default)]
pub struct Sheet {
    cells: AHashMap<Position, Cell>,
    graph: DependencyGraph,
    /// Number of cache misses served so far
    evaluations: Counter<u64>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    // === Editing ===

    /// Set the raw text of the cell at `pos`
    ///
    /// Fails with [`Error::InvalidPosition`], [`Error::FormulaSyntax`] or
    /// [`Error::CircularDependency`]; on failure the sheet is unchanged.
    /// On success every referenced position without a cell gets an empty one.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        let pos = pos.validate()?;

        let candidate = Cell::from_text(text).map_err(|e| {
            debug!("rejected edit at {}: {}", pos, e);
            e
        })?;

        let references = candidate.referenced_cells().to_vec();
        if self.graph.would_create_cycle(pos, &references) {
            debug!("rejected edit at {}: {:?} closes a cycle", pos, text);
            return Err(Error::CircularDependency(pos));
        }

        for &reference in &references {
            self.cells.entry(reference).or_default();
        }
        self.graph.set_precedents(pos, &references);
        self.cells.insert(pos, candidate);

        let invalidated = self.invalidate_dependents(pos);
        debug!(
            "set {} to {:?} ({} references, {} dependents invalidated)",
            pos,
            text,
            references.len(),
            invalidated
        );
        Ok(())
    }

    /// Remove the cell at `pos`, if any
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        let pos = pos.validate()?;

        if self.cells.remove(&pos).is_some() {
            self.graph.clear_precedents(pos);
            let invalidated = self.invalidate_dependents(pos);
            debug!("cleared {} ({} dependents invalidated)", pos, invalidated);
        }
        Ok(())
    }

    /// Discard memoized values of every transitive dependent of `pos`
    ///
    /// A dependent that holds no memoized value already has uncached
    /// dependents, so the walk does not descend past it.
    fn invalidate_dependents(&self, pos: Position) -> usize {
        let cells = &self.cells;
        let mut invalidated = 0;
        self.graph.walk_dependents(pos, |dependent| {
            let dropped = cells.get(&dependent).is_some_and(Cell::invalidate);
            if dropped {
                trace!("invalidated {}", dependent);
                invalidated += 1;
            }
            dropped
        });
        invalidated
    }

    // === Reading ===

    /// Get the cell at `pos`, or `None` if no cell exists there
    pub fn get_cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        let pos = pos.validate()?;
        Ok(self.cells.get(&pos).map(|cell| CellView {
            sheet: self,
            pos,
            cell,
        }))
    }

    /// Iterate over all cells in unspecified order
    pub fn cells(&self) -> impl Iterator<Item = CellView<'_>> + '_ {
        self.cells.iter().map(move |(&pos, cell)| CellView {
            sheet: self,
            pos,
            cell,
        })
    }

    /// Number of cells, including empty ones created for references
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether the sheet holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cache misses served since the sheet was created
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations.get()
    }

    fn evaluate(&self, pos: Position, cell: &Cell) -> CellValue {
        if cell.is_cached() {
            return cell.value(self);
        }
        self.fill_precedents(pos);
        self.recompute(pos, cell)
    }

    fn recompute(&self, pos: Position, cell: &Cell) -> CellValue {
        self.evaluations.set(self.evaluations.get() + 1);
        trace!("recomputing {}", pos);
        cell.value(self)
    }

    /// Compute every uncached transitive precedent of `pos`, deepest first
    ///
    /// Afterwards each lookup made while computing `pos` is a cache hit, so
    /// evaluation depth stays constant however long the reference chain is.
    /// A cached cell only has cached precedents, so the walk stops there.
    fn fill_precedents(&self, pos: Position) {
        let mut seen = AHashSet::new();
        let mut stack = vec![(pos, false)];

        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                if current != pos {
                    if let Some(cell) = self.cells.get(&current) {
                        if !cell.is_cached() {
                            self.recompute(current, cell);
                        }
                    }
                }
                continue;
            }
            if !seen.insert(current) {
                continue;
            }

            stack.push((current, true));
            for &precedent in self.graph.get_precedents(current) {
                let uncached = self
                    .cells
                    .get(&precedent)
                    .is_some_and(|cell| !cell.is_cached());
                if uncached && !seen.contains(&precedent) {
                    stack.push((precedent, false));
                }
            }
        }
    }

    // === Output ===

    /// Size of the origin-anchored rectangle covering every cell
    ///
    /// Empty cells count too, including those created for references.
    pub fn printable_size(&self) -> Size {
        self.cells
            .keys()
            .fold(Size::default(), |size, pos| Size {
                rows: size.rows.max(pos.row + 1),
                cols: size.cols.max(pos.col + 1),
            })
    }

    /// Write cell values, tab separated, one line per row
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |view| view.value().to_string())
    }

    /// Write cell texts, tab separated, one line per row
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |view| view.text())
    }

    fn print_with<W, F>(&self, out: &mut W, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&CellView<'_>) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_all(b"\t")?;
                }
                let pos = Position::new(row, col);
                if let Some(cell) = self.cells.get(&pos) {
                    let view = CellView {
                        sheet: self,
                        pos,
                        cell,
                    };
                    out.write_all(render(&view).as_bytes())?;
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl CellLookup for Sheet {
    fn cell_value(&self, pos: Position) -> Option<CellValue> {
        self.cells.get(&pos).map(|cell| self.evaluate(pos, cell))
    }
}

/// Read access to one cell of a sheet
///
/// Values are resolved against the sheet the cell belongs to.
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    pos: Position,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    /// Where the cell is
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Current value, recomputed only if the cache was invalidated
    pub fn value(&self) -> CellValue {
        self.sheet.evaluate(self.pos, self.cell)
    }

    /// Text as shown in an edit view
    pub fn text(&self) -> String {
        self.cell.text()
    }

    /// How the text was interpreted
    pub fn kind(&self) -> &'a CellKind {
        self.cell.kind()
    }

    /// Positions this cell's formula references
    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.referenced_cells()
    }

    /// Check whether the memoized value can be reused
    pub fn is_cached(&self) -> bool {
        self.cell.is_cached()
    }

    /// The underlying cell
    pub fn cell(&self) -> &'a Cell {
        self.cell
    }
}
