// SPDX-License-Identifier: MIT
//
// FrameBuffer: the 2D cell grid that a frame is painted into.
//
// Row-major flat `Vec<Cell>`: a row is a contiguous slice, which is what
// the renderer walks. Painting outside the buffer is silently clipped, so
// callers never have to bounds-check before drawing.
//
// Wide characters are written as a lead cell plus a continuation cell.
// A wide character that would straddle the right edge is not drawn.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Style};

/// A grid of cells backing one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with [`Cell::EMPTY`].
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// The cell at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// One full row, or `None` past the bottom.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = usize::from(y) * usize::from(self.width);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// Overwrite one cell. Returns `false` if `(x, y)` is outside.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Reset every cell to [`Cell::EMPTY`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Change dimensions. Contents are discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// Fill a rectangle with `cell`, clipped to the buffer.
    pub fn fill(&mut self, x: u16, y: u16, width: u16, height: u16, cell: Cell) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                self.set(col, row, cell);
            }
        }
    }

    /// Paint a string starting at `(x, y)` and return the column after the
    /// last painted cell.
    ///
    /// Zero-width characters are dropped. A wide character that does not
    /// fit before the right edge ends the run.
    pub fn paint_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if y >= self.height || usize::from(col) + w > usize::from(self.width) {
                break;
            }
            self.set(col, y, Cell::styled(ch, style));
            if w == 2 {
                self.set(col + 1, y, Cell::continuation(style));
            }
            // Bounded by `self.width` above.
            #[allow(clippy::cast_possible_truncation)]
            {
                col += w as u16;
            }
        }
        col
    }

    /// Paint `text` centered in `[x, x + width)`, padding with the style's
    /// background.
    pub fn paint_centered(&mut self, x: u16, y: u16, width: u16, text: &str, style: Style) {
        self.fill(x, y, width, 1, Cell::styled(' ', style));
        let text_width = text_width(text);
        let pad = usize::from(width).saturating_sub(text_width) / 2;
        #[allow(clippy::cast_possible_truncation)]
        self.paint_text(x.saturating_add(pad as u16), y, text, style);
    }
}

/// Display width of a character in terminal columns (0, 1, or 2).
///
/// Control characters count as zero: they never reach the screen.
#[must_use]
pub fn char_width(ch: char) -> usize {
    if ch.is_control() {
        0
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Display width of a string in terminal columns.
#[must_use]
pub fn text_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
