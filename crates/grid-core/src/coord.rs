//! Board coordinates and wrapping arithmetic.
//!
//! All coordinates are **0-indexed**. Movement never clamps: stepping off any
//! edge re-enters on the opposite side. Two orders matter:
//!
//! - **Typewriter order** ([`Dims::next`] / [`Dims::prev`]): left to right,
//!   then down a row; the last cell wraps to the first.
//! - **Axis order** ([`Dims::relative`]): each axis wraps on its own, so
//!   moving right from the last column stays on the same row.
//!
//! Display layers convert to 1-indexed themselves.

use std::fmt;

use crate::error::GridError;

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// A cell position: (row, col), both 0-indexed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed, the way a player counts.
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Dims
// ---------------------------------------------------------------------------

/// Board dimensions. Both are positive and fixed for the life of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    rows: usize,
    cols: usize,
}

/// Reduce a signed offset into `[0, n)`. `n` is positive.
#[inline]
fn wrap_axis(value: isize, n: usize) -> usize {
    let n = isize::try_from(n).unwrap_or(isize::MAX);
    value.rem_euclid(n).unsigned_abs()
}

/// `pos + delta` modulo `n`. The delta is reduced first, so no offset
/// overflows.
#[inline]
fn step_axis(pos: usize, delta: isize, n: usize) -> usize {
    let pos = pos % n;
    let gap = n - wrap_axis(delta, n);
    if pos >= gap { pos - gap } else { pos + (n - gap) }
}

impl Dims {
    /// # Errors
    ///
    /// [`GridError::EmptyDimension`] if either dimension is zero.
    pub const fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyDimension { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    #[inline]
    #[must_use]
    pub const fn rows(self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub const fn cols(self) -> usize {
        self.cols
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.rows * self.cols
    }

    /// Always `false`; dimensions are validated positive.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, at: Coord) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    /// Top-left cell.
    #[inline]
    #[must_use]
    pub const fn first(self) -> Coord {
        Coord::ORIGIN
    }

    /// Bottom-right cell.
    #[inline]
    #[must_use]
    pub const fn last(self) -> Coord {
        Coord::new(self.rows - 1, self.cols - 1)
    }

    /// Typewriter index of an in-range coordinate.
    #[inline]
    #[must_use]
    pub const fn index(self, at: Coord) -> usize {
        at.row * self.cols + at.col
    }

    /// Inverse of [`index`](Self::index), wrapping past the end.
    #[inline]
    #[must_use]
    pub const fn coord_at(self, index: usize) -> Coord {
        let index = index % self.len();
        Coord::new(index / self.cols, index % self.cols)
    }

    /// Bring an arbitrary signed `(row, col)` pair into range, each axis
    /// independently.
    #[must_use]
    pub fn wrap(self, row: isize, col: isize) -> Coord {
        Coord::new(wrap_axis(row, self.rows), wrap_axis(col, self.cols))
    }

    /// Bring an unsigned coordinate into range.
    #[inline]
    #[must_use]
    pub const fn wrap_coord(self, at: Coord) -> Coord {
        Coord::new(at.row % self.rows, at.col % self.cols)
    }

    /// The cell after `at` in typewriter order.
    ///
    /// ```
    /// use grid_core::{Coord, Dims};
    ///
    /// let dims = Dims::new(4, 4).unwrap();
    /// assert_eq!(dims.next(Coord::new(0, 3)), Coord::new(1, 0));
    /// assert_eq!(dims.next(Coord::new(3, 3)), Coord::new(0, 0));
    /// ```
    #[must_use]
    pub const fn next(self, at: Coord) -> Coord {
        if at.col + 1 < self.cols {
            Coord::new(at.row, at.col + 1)
        } else if at.row + 1 < self.rows {
            Coord::new(at.row + 1, 0)
        } else {
            Coord::ORIGIN
        }
    }

    /// The cell before `at` in typewriter order. Exact inverse of
    /// [`next`](Self::next).
    #[must_use]
    pub const fn prev(self, at: Coord) -> Coord {
        if at.col > 0 {
            Coord::new(at.row, at.col - 1)
        } else if at.row > 0 {
            Coord::new(at.row - 1, self.cols - 1)
        } else {
            self.last()
        }
    }

    /// Offset `at` by `(d_row, d_col)`, wrapping each axis on its own.
    #[must_use]
    pub fn relative(self, at: Coord, d_row: isize, d_col: isize) -> Coord {
        Coord::new(
            step_axis(at.row, d_row, self.rows),
            step_axis(at.col, d_col, self.cols),
        )
    }

    /// [`next`](Self::next) applied `n` times, in constant time.
    #[must_use]
    pub const fn advance(self, at: Coord, n: usize) -> Coord {
        let len = self.len();
        self.coord_at((self.index(at) % len + n % len) % len)
    }

    /// Every cell in typewriter order.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = Coord> + ExactSizeIterator {
        (0..self.len()).map(move |i| self.coord_at(i))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
