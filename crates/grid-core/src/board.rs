//! The board: a fixed grid of single-character cells.
//!
//! A [`Board`] is an immutable value. Every mutation returns a new board and
//! leaves the receiver alone, so older snapshots stay valid and comparable.
//! Rows are reference-counted: a new board shares every row it did not touch
//! with the board it came from, so a one-cell edit on a large grid copies one
//! row plus the row table.

use std::fmt;
use std::sync::Arc;

use crate::coord::{Coord, Dims};
use crate::error::GridError;
use crate::normalize::normalize_text;

/// One cell: empty, or exactly one character.
pub type Cell = Option<char>;

/// Marks an empty cell in text form.
pub const EMPTY_MARK: char = '.';

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    dims: Dims,
    rows: Vec<Arc<Vec<Cell>>>,
}

impl Board {
    /// An all-empty board.
    #[must_use]
    pub fn new(dims: Dims) -> Self {
        let blank = Arc::new(vec![None; dims.cols()]);
        Self {
            dims,
            rows: vec![blank; dims.rows()],
        }
    }

    /// Build a board from one string per row. `.` is an empty cell and
    /// missing trailing cells or rows are empty.
    ///
    /// # Errors
    ///
    /// [`GridError::PresetTooLong`] if there are more rows than `dims.rows()`
    /// or a row is longer than `dims.cols()`.
    pub fn from_rows(dims: Dims, rows: &[&str]) -> Result<Self, GridError> {
        if rows.len() > dims.rows() {
            return Err(GridError::PresetTooLong {
                len: rows.len() * dims.cols(),
                capacity: dims.len(),
            });
        }
        let mut board = Self::new(dims);
        for (r, text) in rows.iter().enumerate() {
            let cells = preset_cells(text);
            if cells.len() > dims.cols() {
                return Err(GridError::PresetTooLong {
                    len: r * dims.cols() + cells.len(),
                    capacity: dims.len(),
                });
            }
            let row = Arc::make_mut(&mut board.rows[r]);
            row[..cells.len()].copy_from_slice(&cells);
        }
        Ok(board)
    }

    /// Build a board filled in typewriter order from `text`. `.` is an
    /// empty cell.
    ///
    /// # Errors
    ///
    /// [`GridError::PresetTooLong`] if `text` has more cells than the board.
    pub fn with_preset(dims: Dims, text: &str) -> Result<Self, GridError> {
        let cells = preset_cells(text);
        if cells.len() > dims.len() {
            return Err(GridError::PresetTooLong {
                len: cells.len(),
                capacity: dims.len(),
            });
        }
        let mut board = Self::new(dims);
        for (i, cell) in cells.into_iter().enumerate() {
            board.set(dims.coord_at(i), cell);
        }
        Ok(board)
    }

    #[inline]
    #[must_use]
    pub const fn dims(&self) -> Dims {
        self.dims
    }

    /// The cell at `at`, or `None` if `at` is outside the board or empty.
    #[must_use]
    pub fn get(&self, at: Coord) -> Cell {
        if !self.dims.contains(at) {
            return None;
        }
        self.rows[at.row][at.col]
    }

    /// One row of cells.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(|r| r.as_slice())
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.iter().filter(|c| c.is_some()).count())
            .sum()
    }

    /// Write `value` one character per cell starting at `at`.
    ///
    /// Returns the new board and the coordinate after the last written
    /// cell. Text longer than the board wraps to the first cell and
    /// overwrites. Text that normalizes to nothing changes nothing and
    /// returns `at`.
    #[must_use]
    pub fn insert(&self, value: &str, at: Coord) -> (Self, Coord) {
        let chars = normalize_text(value);
        let mut at = self.dims.wrap_coord(at);
        if chars.is_empty() {
            return (self.clone(), at);
        }
        let mut board = self.clone();
        for ch in chars {
            board.set(at, Some(ch));
            at = self.dims.next(at);
        }
        (board, at)
    }

    /// Clear the cell at `at`.
    #[must_use]
    pub fn delete(&self, at: Coord) -> Self {
        let at = self.dims.wrap_coord(at);
        if self.get(at).is_none() {
            return self.clone();
        }
        let mut board = self.clone();
        board.set(at, None);
        board
    }

    /// An empty board of the same size.
    #[must_use]
    pub fn clear_all(&self) -> Self {
        Self::new(self.dims)
    }

    /// Rows joined with `\n`, empty cells as `.`.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.unwrap_or(EMPTY_MARK)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Copy-on-write store into an in-range cell.
    fn set(&mut self, at: Coord, cell: Cell) {
        let row = Arc::make_mut(&mut self.rows[at.row]);
        row[at.col] = cell;
    }

    /// Whether row `row` is physically shared with `other`'s.
    #[cfg(test)]
    fn shares_row(&self, other: &Self, row: usize) -> bool {
        Arc::ptr_eq(&self.rows[row], &other.rows[row])
    }
}

/// Preset text to cells: normalized like typed text, with `.` as empty.
fn preset_cells(text: &str) -> Vec<Cell> {
    normalize_text(text)
        .into_iter()
        .map(|ch| (ch != EMPTY_MARK).then_some(ch))
        .collect()
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {}x{}", self.dims.rows(), self.dims.cols())?;
        f.write_str(&self.to_text())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
