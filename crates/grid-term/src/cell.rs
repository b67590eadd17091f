// SPDX-License-Identifier: MIT
//
// Cell: one character position on screen.
//
// A cell carries a character, foreground and background colors, and a
// small attribute set. The frame buffer is a flat array of these and the
// renderer diffs two such arrays to decide what to send to the terminal.
//
// Wide characters (CJK, most emoji) take two columns. The first cell holds
// the character and the second is a continuation cell (`ch == '\0'`) that
// only contributes its background.

use bitflags::bitflags;

// ─── Attributes ─────────────────────────────────────────────────────────────

bitflags! {
    /// Text attributes, each mapping to one SGR parameter.
    ///
    /// ```
    /// use grid_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::INVERSE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1.
        const BOLD      = 1 << 0;
        /// SGR 2.
        const DIM       = 1 << 1;
        /// SGR 4.
        const UNDERLINE = 1 << 2;
        /// SGR 7: swap foreground and background.
        const INVERSE   = 1 << 3;
    }
}

impl Attr {
    /// SGR parameter codes for every set flag, in ascending order.
    pub(crate) fn sgr_codes(self) -> impl Iterator<Item = u8> {
        [
            (Self::BOLD, 1),
            (Self::DIM, 2),
            (Self::UNDERLINE, 4),
            (Self::INVERSE, 7),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, code)| code)
    }
}

// ─── Color ──────────────────────────────────────────────────────────────────

/// A terminal color.
///
/// The board uses a fixed, static palette, so there is no color math here:
/// either the terminal default, one of the 256 indexed colors, or 24-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Color {
    /// The terminal's own default foreground or background.
    #[default]
    Default,
    /// Palette index. 0–7 standard, 8–15 bright, 16–255 extended.
    Indexed(u8),
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

// ─── Cell ───────────────────────────────────────────────────────────────────

/// Marker character for the right half of a wide character.
const CONTINUATION: char = '\0';

/// A single screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Character to draw, or `'\0'` for a continuation cell.
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub attr: Attr,
}

impl Cell {
    /// A blank cell: space, default colors, no attributes.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: Color::Default,
        bg: Color::Default,
        attr: Attr::empty(),
    };

    /// Create a cell with default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            fg: Color::Default,
            bg: Color::Default,
            attr: Attr::empty(),
        }
    }

    /// Create a cell with full styling.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, style: Style) -> Self {
        Self {
            ch,
            fg: style.fg,
            bg: style.bg,
            attr: style.attr,
        }
    }

    /// Right half of a wide character, carrying the parent's style.
    #[inline]
    #[must_use]
    pub const fn continuation(style: Style) -> Self {
        Self::styled(CONTINUATION, style)
    }

    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    /// The style part of the cell.
    #[inline]
    #[must_use]
    pub const fn style(self) -> Style {
        Style {
            fg: self.fg,
            bg: self.bg,
            attr: self.attr,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Style ──────────────────────────────────────────────────────────────────

/// Colors plus attributes, without a character.
///
/// Paint operations take a `Style` so callers describe "how" once and
/// reuse it across a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attr: Attr,
}

impl Style {
    /// Terminal defaults, no attributes.
    pub const PLAIN: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        attr: Attr::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    #[inline]
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    #[inline]
    #[must_use]
    pub const fn attr(mut self, attr: Attr) -> Self {
        self.attr = attr;
        self
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
