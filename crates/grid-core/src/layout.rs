//! Screen geometry for the board.
//!
//! The board is drawn as a box-drawing grid, each cell three columns wide
//! and one row tall, with one-column and one-row rules between cells:
//!
//! ```text
//! ┌───┬───┐
//! │ A │   │
//! ├───┼───┤
//! │   │ B │
//! └───┴───┘
//! ```
//!
//! The grid is centered in the screen above a one-row status bar. All
//! positions are 0-indexed screen cells.

use grid_term::terminal::Size;

use crate::coord::{Coord, Dims};

/// Interior width of one cell.
pub const CELL_WIDTH: usize = 3;
/// Horizontal distance between cell origins (interior plus rule).
const PITCH_X: usize = CELL_WIDTH + 1;
/// Vertical distance between cell rows.
const PITCH_Y: usize = 2;
/// Rows reserved under the board.
const STATUS_ROWS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    dims: Dims,
    screen: Size,
    /// Top-left corner of the frame, when it fits.
    origin: Option<(u16, u16)>,
}

impl Layout {
    /// Frame width and height for `dims`, in screen cells.
    #[must_use]
    pub const fn frame_size(dims: Dims) -> (usize, usize) {
        (dims.cols() * PITCH_X + 1, dims.rows() * PITCH_Y + 1)
    }

    /// Smallest screen that shows the whole board plus the status bar.
    #[must_use]
    pub const fn min_screen(dims: Dims) -> (usize, usize) {
        let (w, h) = Self::frame_size(dims);
        (w, h + STATUS_ROWS)
    }

    /// Place the board for a screen of `screen` cells.
    #[must_use]
    pub fn compute(dims: Dims, screen: Size) -> Self {
        let (width, height) = Self::frame_size(dims);
        let cols = usize::from(screen.cols);
        let rows = usize::from(screen.rows).saturating_sub(STATUS_ROWS);
        let origin = (width <= cols && height <= rows).then(|| {
            // Both offsets are below the screen size, which is a u16.
            let x = u16::try_from((cols - width) / 2).unwrap_or(0);
            let y = u16::try_from((rows - height) / 2).unwrap_or(0);
            (x, y)
        });
        Self { dims, screen, origin }
    }

    #[inline]
    #[must_use]
    pub const fn dims(&self) -> Dims {
        self.dims
    }

    #[inline]
    #[must_use]
    pub const fn screen(&self) -> Size {
        self.screen
    }

    /// Whether the board fits on screen.
    #[inline]
    #[must_use]
    pub const fn fits(&self) -> bool {
        self.origin.is_some()
    }

    /// Top-left corner of the frame.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Option<(u16, u16)> {
        self.origin
    }

    /// Row of the status bar.
    #[must_use]
    pub const fn status_row(&self) -> u16 {
        self.screen.rows.saturating_sub(1)
    }

    /// Top-left screen cell of the interior of `at`.
    #[must_use]
    pub fn cell_rect(&self, at: Coord) -> Option<(u16, u16)> {
        let (ox, oy) = self.origin?;
        if !self.dims.contains(at) {
            return None;
        }
        let x = usize::from(ox) + 1 + at.col * PITCH_X;
        let y = usize::from(oy) + 1 + at.row * PITCH_Y;
        Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }

    /// Where the caret sits for `at`: the middle column of its interior.
    #[must_use]
    pub fn cell_origin(&self, at: Coord) -> Option<(u16, u16)> {
        self.cell_rect(at).map(|(x, y)| (x + 1, y))
    }

    /// The cell whose interior contains screen position `(x, y)`.
    ///
    /// Rules, corners, and everything outside the frame hit nothing.
    #[must_use]
    pub fn cell_at(&self, x: u16, y: u16) -> Option<Coord> {
        let (ox, oy) = self.origin?;
        let dx = usize::from(x).checked_sub(usize::from(ox) + 1)?;
        let dy = usize::from(y).checked_sub(usize::from(oy) + 1)?;
        if dx % PITCH_X == CELL_WIDTH || dy % PITCH_Y == 1 {
            return None;
        }
        let at = Coord::new(dy / PITCH_Y, dx / PITCH_X);
        self.dims.contains(at).then_some(at)
    }
}
