//! Dependency tracking between formula cells

use ahash::{AHashMap, AHashSet};
use tabula_core::Position;

/// Dependency graph for formula cells
///
/// Keeps both directions of every "cell references cell" edge: precedents
/// (what a formula reads) for cycle checks, and dependents (who reads a
/// cell) for cache invalidation.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Cell → Cells that depend on it (dependents)
    dependents: AHashMap<Position, AHashSet<Position>>,
    /// Cell → Cells it depends on (precedents)
    precedents: AHashMap<Position, Vec<Position>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all outgoing edges of `cell` with edges to `references`
    ///
    /// Edges pointing *at* `cell` are untouched.
    pub fn set_precedents(&mut self, cell: Position, references: &[Position]) {
        self.clear_precedents(cell);
        if references.is_empty() {
            return;
        }

        for &precedent in references {
            self.dependents.entry(precedent).or_default().insert(cell);
        }
        self.precedents.insert(cell, references.to_vec());
    }

    /// Remove all outgoing edges of `cell`
    pub fn clear_precedents(&mut self, cell: Position) {
        let Some(old) = self.precedents.remove(&cell) else {
            return;
        };

        for precedent in old {
            if let Some(deps) = self.dependents.get_mut(&precedent) {
                deps.remove(&cell);
                if deps.is_empty() {
                    self.dependents.remove(&precedent);
                }
            }
        }
    }

    /// Get cells that depend on the given cell
    pub fn get_dependents(&self, cell: Position) -> impl Iterator<Item = Position> + '_ {
        self.dependents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get cells that the given cell depends on
    pub fn get_precedents(&self, cell: Position) -> &[Position] {
        self.precedents.get(&cell).map_or(&[], Vec::as_slice)
    }

    /// Check whether giving `cell` the outgoing edges `references` would close a cycle
    ///
    /// Walks the committed precedent edges depth-first from each reference,
    /// visiting every cell at most once. The graph itself is not modified.
    pub fn would_create_cycle(&self, cell: Position, references: &[Position]) -> bool {
        let mut visited = AHashSet::new();
        let mut stack: Vec<Position> = references.to_vec();

        while let Some(current) = stack.pop() {
            if current == cell {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.extend(
                self.get_precedents(current)
                    .iter()
                    .filter(|p| !visited.contains(*p)),
            );
        }

        false
    }

    /// Walk the transitive dependents of `cell`
    ///
    /// `visit` is called once per reachable dependent; returning `false`
    /// stops the walk from descending past that cell. `cell` itself is not
    /// visited. Returns the number of cells visited.
    pub fn walk_dependents<F>(&self, cell: Position, mut visit: F) -> usize
    where
        F: FnMut(Position) -> bool,
    {
        let mut seen = AHashSet::new();
        let mut stack: Vec<Position> = self.get_dependents(cell).collect();
        let mut count = 0;

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            count += 1;
            if visit(current) {
                stack.extend(self.get_dependents(current));
            }
        }

        log::trace!("walked {} dependents of {}", count, cell);
        count
    }

    /// Number of cells with outgoing edges
    pub fn formula_count(&self) -> usize {
        self.precedents.len()
    }
}
