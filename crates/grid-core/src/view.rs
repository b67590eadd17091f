//! Painting a board snapshot.
//!
//! [`render`] draws the frame, the cells, and the status bar into a
//! [`FrameBuffer`]. It reads the state and layout and nothing else, so the
//! same snapshot always paints the same frame.

use grid_term::buffer::{FrameBuffer, text_width};
use grid_term::cell::{Attr, Cell, Color, Style};

use crate::coord::Coord;
use crate::layout::{CELL_WIDTH, Layout};
use crate::state::GridState;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

const FRAME: Style = Style::PLAIN.fg(Color::Indexed(4));
const LETTER: Style = Style::PLAIN.attr(Attr::BOLD);
const FOCUSED: Style = Style::PLAIN
    .fg(Color::Indexed(0))
    .bg(Color::Indexed(6))
    .attr(Attr::BOLD);
const DISABLED: Style = Style::PLAIN.fg(Color::Indexed(8)).attr(Attr::DIM);
const DISABLED_FOCUSED: Style = Style::PLAIN
    .fg(Color::Indexed(8))
    .bg(Color::Indexed(0))
    .attr(Attr::DIM);
const STATUS: Style = Style::PLAIN.attr(Attr::INVERSE);
const WARNING: Style = Style::PLAIN.fg(Color::Indexed(3)).attr(Attr::BOLD);

const HINTS: &str = "Tab next  Ctrl+D lock  Ctrl+L clear  Ctrl+Q quit";

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Paint `state` into `buf` according to `layout`.
pub fn render(state: &GridState, layout: &Layout, buf: &mut FrameBuffer) {
    if layout.origin().is_none() {
        render_too_small(layout, buf);
        return;
    }
    render_frame(state, layout, buf);
    for at in state.dims().iter() {
        render_cell(state, layout, buf, at);
    }
    render_status(state, layout, buf);
}

/// Where the hardware cursor goes: on the focused cell, if it is visible.
#[must_use]
pub fn cursor(state: &GridState, layout: &Layout) -> Option<(u16, u16)> {
    state.focus().and_then(|at| layout.cell_origin(at))
}

fn render_frame(state: &GridState, layout: &Layout, buf: &mut FrameBuffer) {
    let Some((ox, oy)) = layout.origin() else {
        return;
    };
    let dims = state.dims();
    let style = if state.is_disabled() { DISABLED } else { FRAME };
    let bar = "─".repeat(CELL_WIDTH);

    let rule = |left: &str, mid: &str, right: &str| {
        let mut line = String::from(left);
        for c in 0..dims.cols() {
            if c > 0 {
                line.push_str(mid);
            }
            line.push_str(&bar);
        }
        line.push_str(right);
        line
    };
    let top = rule("┌", "┬", "┐");
    let between = rule("├", "┼", "┤");
    let bottom = rule("└", "┴", "┘");
    let blank = " ".repeat(CELL_WIDTH);
    let walls = rule("│", "│", "│").replace(&bar, &blank);

    let mut y = oy;
    buf.paint_text(ox, y, &top, style);
    for r in 0..dims.rows() {
        y += 1;
        buf.paint_text(ox, y, &walls, style);
        y += 1;
        let line = if r + 1 == dims.rows() { &bottom } else { &between };
        buf.paint_text(ox, y, line, style);
    }
}

fn render_cell(state: &GridState, layout: &Layout, buf: &mut FrameBuffer, at: Coord) {
    let Some((x, y)) = layout.cell_rect(at) else {
        return;
    };
    let focused = state.focus() == Some(at);
    let style = match (state.is_disabled(), focused) {
        (false, true) => FOCUSED,
        (false, false) => LETTER,
        (true, true) => DISABLED_FOCUSED,
        (true, false) => DISABLED,
    };

    // Focus shows as a filled background across the whole interior.
    let fill = if focused { style } else { Style::PLAIN };
    #[allow(clippy::cast_possible_truncation)]
    buf.fill(x, y, CELL_WIDTH as u16, 1, Cell::styled(' ', fill));
    if let Some(ch) = state.board().get(at) {
        let mut utf8 = [0u8; 4];
        buf.paint_text(x + 1, y, ch.encode_utf8(&mut utf8), style);
    }
}

fn render_status(state: &GridState, layout: &Layout, buf: &mut FrameBuffer) {
    let y = layout.status_row();
    let width = buf.width();
    buf.fill(0, y, width, 1, Cell::styled(' ', STATUS));

    let dims = state.dims();
    let focus = state
        .focus()
        .map_or_else(|| "--".to_owned(), |at| format!("R{} C{}", at.row + 1, at.col + 1));
    let mut left = format!(
        " {focus}  {}/{} filled",
        state.board().filled_count(),
        dims.len()
    );
    if state.is_disabled() {
        left.push_str("  LOCKED");
    }
    let end = buf.paint_text(0, y, &left, STATUS);

    // Hints are right-aligned and dropped when they would collide.
    let hints_width = text_width(HINTS) + 1;
    if let Ok(hints_width) = u16::try_from(hints_width) {
        if usize::from(end) + usize::from(hints_width) + 2 <= usize::from(width) {
            buf.paint_text(width - hints_width, y, HINTS, STATUS);
        }
    }
}

fn render_too_small(layout: &Layout, buf: &mut FrameBuffer) {
    let (need_w, need_h) = Layout::min_screen(layout.dims());
    let screen = layout.screen();
    let lines = [
        "terminal too small".to_owned(),
        format!("need {need_w}x{need_h}, have {}x{}", screen.cols, screen.rows),
    ];
    let width = buf.width();
    let top = buf.height().saturating_sub(2) / 2;
    for (dy, line) in (0u16..).zip(lines.iter()) {
        buf.paint_centered(0, top + dy, width, line, WARNING);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
