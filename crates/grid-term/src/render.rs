// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Each frame is compared against the one drawn before it and only the cells
// that differ are sent to the terminal. A keystroke on the board touches one
// or two cells plus the status row, so steady-state frames are a few dozen
// bytes.
//
// The pipeline per frame:
//
//   1. The app paints into a FrameBuffer.
//   2. Renderer::render() diffs it against the stored previous frame and
//      appends escapes to an internal byte buffer.
//   3. Renderer::flush_to() writes that buffer with a single write call.
//
// Cursor position and the active SGR style are tracked while emitting, so
// a run of adjacent same-style cells costs one move and one style change.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::cell::{Cell, Style};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame and were written.
    pub cells_rendered: usize,
    /// Cells that matched and were skipped.
    pub cells_skipped: usize,
    /// Bytes of escape output produced.
    pub bytes_written: usize,
}

// ─── Renderer ────────────────────────────────────────────────────────────────

/// Diffing renderer that keeps the last frame it drew.
///
/// ```
/// use grid_term::buffer::FrameBuffer;
/// use grid_term::render::Renderer;
///
/// let mut renderer = Renderer::new();
/// let frame = FrameBuffer::new(20, 4);
/// let first = renderer.render(&frame, None);
/// assert_eq!(first.cells_rendered, 80);
///
/// let second = renderer.render(&frame, None);
/// assert_eq!(second.cells_rendered, 0);
/// ```
#[derive(Debug, Default)]
pub struct Renderer {
    out: Vec<u8>,
    previous: Option<FrameBuffer>,
}

/// Where the terminal cursor and pen are while a frame is being emitted.
struct Pen {
    at: Option<(u16, u16)>,
    style: Option<Style>,
}

impl Pen {
    fn put(&mut self, out: &mut Vec<u8>, x: u16, y: u16, cell: Cell) -> io::Result<()> {
        if self.at != Some((x, y)) {
            ansi::cursor_to(out, x, y)?;
        }
        let style = cell.style();
        if self.style != Some(style) {
            ansi::style(out, style)?;
            self.style = Some(style);
        }
        let mut utf8 = [0u8; 4];
        out.write_all(cell.ch.encode_utf8(&mut utf8).as_bytes())?;
        let advance = u16::try_from(crate::buffer::char_width(cell.ch).max(1)).unwrap_or(1);
        self.at = Some((x.saturating_add(advance), y));
        Ok(())
    }
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `frame` against the previous frame and queue the escape output.
    ///
    /// `cursor` is where the hardware cursor should rest after the frame,
    /// or `None` to hide it. The first frame, and any frame whose size
    /// differs from the last one, is drawn in full.
    pub fn render(&mut self, frame: &FrameBuffer, cursor: Option<(u16, u16)>) -> RenderStats {
        self.out.clear();
        let mut stats = RenderStats::default();

        // Writes into a Vec<u8> cannot fail.
        self.emit(frame, cursor, &mut stats).ok();
        stats.bytes_written = self.out.len();

        match &mut self.previous {
            Some(prev) if prev.width() == frame.width() && prev.height() == frame.height() => {
                prev.clone_from(frame);
            }
            _ => self.previous = Some(frame.clone()),
        }
        stats
    }

    fn emit(
        &mut self,
        frame: &FrameBuffer,
        cursor: Option<(u16, u16)>,
        stats: &mut RenderStats,
    ) -> io::Result<()> {
        let out = &mut self.out;
        ansi::begin_sync(out)?;
        ansi::cursor_hide(out)?;

        let prev = self
            .previous
            .as_ref()
            .filter(|p| p.width() == frame.width() && p.height() == frame.height());
        if prev.is_none() {
            ansi::reset(out)?;
            ansi::clear_screen(out)?;
        }

        let mut pen = Pen { at: None, style: None };
        for y in 0..frame.height() {
            let (Some(row), prev_row) = (frame.row(y), prev.and_then(|p| p.row(y))) else {
                continue;
            };
            if prev_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }
            for (x, cell) in (0u16..).zip(row.iter()) {
                let unchanged = prev_row.is_some_and(|p| p[usize::from(x)] == *cell);
                if unchanged {
                    stats.cells_skipped += 1;
                    continue;
                }
                stats.cells_rendered += 1;
                if cell.is_continuation() {
                    // Covered by the lead cell.
                    continue;
                }
                pen.put(out, x, y, *cell)?;
            }
        }

        ansi::reset(out)?;
        if let Some((x, y)) = cursor {
            ansi::cursor_to(out, x, y)?;
            ansi::cursor_show(out)?;
        }
        ansi::end_sync(out)
    }

    /// Bytes produced by the last [`render`](Self::render).
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.out
    }

    /// Write the queued output to `w` and clear it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.out)?;
        w.flush()?;
        self.out.clear();
        Ok(())
    }

    /// Forget the previous frame so the next render redraws everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Attr, Color};

    fn render(renderer: &mut Renderer, frame: &FrameBuffer) -> (RenderStats, String) {
        let stats = renderer.render(frame, None);
        (stats, String::from_utf8(renderer.output().to_vec()).unwrap())
    }

    #[test]
    fn first_frame_is_full_redraw() {
        let mut renderer = Renderer::new();
        let frame = FrameBuffer::new(5, 3);
        let (stats, out) = render(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 15);
        assert_eq!(stats.cells_skipped, 0);
        assert!(out.contains("\x1b[2J"));
    }

    #[test]
    fn output_is_wrapped_in_sync() {
        let mut renderer = Renderer::new();
        let (_, out) = render(&mut renderer, &FrameBuffer::new(2, 2));
        assert!(out.starts_with("\x1b[?2026h"));
        assert!(out.ends_with("\x1b[0m\x1b[?2026l"));
    }

    #[test]
    fn identical_frame_renders_nothing() {
        let mut renderer = Renderer::new();
        let frame = FrameBuffer::new(5, 3);
        renderer.render(&frame, None);
        let (stats, out) = render(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 0);
        assert_eq!(stats.cells_skipped, 15);
        assert!(!out.contains("\x1b[2J"));
    }

    #[test]
    fn single_change_moves_and_writes_once() {
        let mut renderer = Renderer::new();
        let mut frame = FrameBuffer::new(5, 3);
        renderer.render(&frame, None);

        frame.set(3, 1, Cell::new('Q'));
        let (stats, out) = render(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 1);
        assert_eq!(stats.cells_skipped, 14);
        assert!(out.contains("\x1b[2;4H\x1b[0mQ"));
    }

    #[test]
    fn adjacent_cells_share_move_and_style() {
        let mut renderer = Renderer::new();
        let mut frame = FrameBuffer::new(6, 1);
        renderer.render(&frame, None);

        let style = Style::PLAIN.bg(Color::Indexed(6)).attr(Attr::BOLD);
        frame.paint_text(1, 0, "AB", style);
        let (_, out) = render(&mut renderer, &frame);
        assert_eq!(out.matches("\x1b[1;").count(), 1);
        assert!(out.contains("\x1b[1;2H\x1b[0;1;46mAB"));
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut renderer = Renderer::new();
        renderer.render(&FrameBuffer::new(4, 2), None);
        let (stats, out) = render(&mut renderer, &FrameBuffer::new(6, 2));
        assert_eq!(stats.cells_rendered, 12);
        assert!(out.contains("\x1b[2J"));
    }

    #[test]
    fn force_redraw_repaints() {
        let mut renderer = Renderer::new();
        let frame = FrameBuffer::new(3, 1);
        renderer.render(&frame, None);
        renderer.force_redraw();
        let (stats, _) = render(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 3);
    }

    #[test]
    fn wide_char_skips_continuation_output() {
        let mut renderer = Renderer::new();
        let mut frame = FrameBuffer::new(4, 1);
        renderer.render(&frame, None);
        frame.paint_text(0, 0, "中x", Style::PLAIN);
        let (stats, out) = render(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 3);
        assert!(out.contains("中x"));
        assert!(!out.contains('\0'));
    }

    #[test]
    fn cursor_is_placed_and_shown() {
        let mut renderer = Renderer::new();
        renderer.render(&FrameBuffer::new(4, 4), Some((2, 3)));
        let out = String::from_utf8(renderer.output().to_vec()).unwrap();
        assert!(out.ends_with("\x1b[4;3H\x1b[?25h\x1b[?2026l"));
    }

    #[test]
    fn no_cursor_stays_hidden() {
        let mut renderer = Renderer::new();
        let (_, out) = render(&mut renderer, &FrameBuffer::new(2, 1));
        assert!(out.contains("\x1b[?25l"));
        assert!(!out.contains("\x1b[?25h"));
    }

    #[test]
    fn flush_to_drains_output() {
        let mut renderer = Renderer::new();
        renderer.render(&FrameBuffer::new(2, 1), None);
        let mut sink = Vec::new();
        renderer.flush_to(&mut sink).unwrap();
        assert!(!sink.is_empty());
        assert!(renderer.output().is_empty());
    }
}
