// SPDX-License-Identifier: MIT
//
// ANSI escape sequence encoding.
//
// Stateless writers for every terminal command the board needs. Callers
// decide when to emit; this module only knows the bytes. Positions are
// 0-indexed here and converted to the terminal's 1-indexed convention.

use std::io::{self, Write};

use crate::cell::{Color, Style};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column `x`, row `y` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Terminal cursor shape (DECSCUSR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Whatever the user's terminal is configured with.
    #[default]
    Default,
    SteadyBlock,
    SteadyUnderline,
    SteadyBar,
}

/// Set the cursor shape.
#[inline]
pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    let n = match shape {
        CursorShape::Default => 0,
        CursorShape::SteadyBlock => 2,
        CursorShape::SteadyUnderline => 4,
        CursorShape::SteadyBar => 6,
    };
    write!(w, "\x1b[{n} q")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the whole screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Enter the alternate screen (DEC 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Leave the alternate screen, restoring the shell's content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

/// Begin synchronized output (DEC 2026). The terminal holds the frame
/// until [`end_sync`].
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Emit one SGR sequence that fully describes `style`.
///
/// Always starts from `0` (reset), so the result never depends on what
/// the terminal had before. `Style::PLAIN` encodes as `\x1b[0m`.
pub fn style(w: &mut impl Write, style: Style) -> io::Result<()> {
    w.write_all(b"\x1b[0")?;
    for code in style.attr.sgr_codes() {
        write!(w, ";{code}")?;
    }
    color(w, style.fg, 30)?;
    color(w, style.bg, 40)?;
    w.write_all(b"m")
}

/// Append `;<params>` for a color. `base` is 30 for foreground, 40 for
/// background; bright colors sit 60 above their base.
fn color(w: &mut impl Write, color: Color, base: u8) -> io::Result<()> {
    match color {
        Color::Default => Ok(()),
        Color::Indexed(i @ 0..=7) => write!(w, ";{}", base + i),
        Color::Indexed(i @ 8..=15) => write!(w, ";{}", base + 60 + (i - 8)),
        Color::Indexed(i) => write!(w, ";{};5;{i}", base + 8),
        Color::Rgb(r, g, b) => write!(w, ";{};2;{r};{g};{b}", base + 8),
    }
}

// ─── Input Features ─────────────────────────────────────────────────────────

/// Report mouse button presses and releases in SGR format (DEC 1000 + 1006).
///
/// Only clicks are needed: a click focuses a cell. Motion tracking stays off.
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1000h\x1b[?1006h")
}

pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1006l\x1b[?1000l")
}

/// Bracketed paste (DEC 2004): pasted text arrives between `CSI 200~`
/// and `CSI 201~`, so a multi-character paste becomes one insert.
#[inline]
pub fn enable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004h")
}

#[inline]
pub fn disable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004l")
}

/// Focus reporting (DEC 1004): `CSI I` on gain, `CSI O` on loss.
#[inline]
pub fn enable_focus_reporting(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1004h")
}

#[inline]
pub fn disable_focus_reporting(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1004l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
