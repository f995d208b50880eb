//! Cell position and sheet size types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell position (e.g., "A1")
///
/// Positions are 0-based internally and displayed in A1 notation with
/// 1-based rows. A position may be constructed outside the grid; such a
/// position is *invalid* and rejected by every sheet operation.
/// Positions order row-major: first by row, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
}

impl Position {
    /// Create a new position
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Check whether both coordinates lie inside the grid
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Return the position itself if valid, [`Error::InvalidPosition`] otherwise
    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::InvalidPosition(self))
        }
    }

    /// Parse a position from A1-style notation
    ///
    /// Column letters must be upper case. The parsed position must lie
    /// inside the grid.
    ///
    /// # Examples
    /// ```
    /// use tabula_core::Position;
    ///
    /// let pos = Position::parse("A1").unwrap();
    /// assert_eq!((pos.row, pos.col), (0, 0));
    ///
    /// let pos = Position::parse("AB12").unwrap();
    /// assert_eq!((pos.row, pos.col), (11, 27));
    ///
    /// assert!(Position::parse("a1").is_err());
    /// assert!(Position::parse("A0").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let letters_end = s
            .find(|c: char| !c.is_ascii_uppercase())
            .unwrap_or(s.len());

        if letters_end == 0 {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let (letters, digits) = s.split_at(letters_end);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(letters)?;

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("row number too large in '{}'", s)))?;

        // Rows are 1-based in text, 0-based internally
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        let row = row - 1;
        if row >= MAX_ROWS {
            return Err(Error::InvalidAddress(format!(
                "row {} out of range in '{}'",
                row + 1,
                s
            )));
        }

        Ok(Self { row, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert upper-case column letters to an index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_uppercase() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(c as u32 - 'A' as u32 + 1))
                .filter(|&v| v <= MAX_COLS as u32)
                .ok_or_else(|| {
                    Error::InvalidAddress(format!("column '{}' out of range", letters))
                })?;
        }

        Ok((col - 1) as u16)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        let mut result = Self::column_to_letters(self.col);
        result.push_str(&(self.row as u64 + 1).to_string());
        result
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Printable extent of a sheet, anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Number of rows from row 0 through the last populated row
    pub rows: u32,
    /// Number of columns from column 0 through the last populated column
    pub cols: u16,
}

impl Size {
    /// Create a new size
    pub const fn new(rows: u32, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Check whether the size covers no cells
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}
