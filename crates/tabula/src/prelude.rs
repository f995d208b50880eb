//! Prelude module - common imports for tabula users
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellKind,
    CellLookup,
    CellValue,
    CellView,
    // Error types
    Error,
    FormulaError,
    // Grid types
    Position,
    Result,
    // Main types
    Sheet,
    Size,
};
