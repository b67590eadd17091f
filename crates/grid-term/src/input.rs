// SPDX-License-Identifier: MIT
//
// Terminal input decoding.
//
// Raw stdin bytes in, structured events out. Covers what `terminal.rs`
// turns on plus whatever a stock xterm-compatible terminal sends anyway:
//
//   - C0 controls and ASCII, decoded as keys (Ctrl+letter for 0x01..0x1A)
//   - CSI and SS3 cursor/editing/function keys, with xterm modifiers
//   - SGR mouse clicks and wheel (motion reports are discarded)
//   - bracketed paste, collected into one event
//   - focus in / focus out
//   - Alt+key as ESC followed by a key
//   - multi-byte UTF-8
//
// A sequence can be split across reads, so undecoded bytes stay in the
// parser until more arrive. A lone ESC is ambiguous until the caller's
// escape timeout expires and calls `flush`.

use bitflags::bitflags;

// ─── Events ─────────────────────────────────────────────────────────────────

/// One decoded input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Everything between the bracketed paste delimiters, as one string.
    Paste(String),
    FocusGained,
    FocusLost,
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// `true` for Ctrl+`c` (case-insensitive), with or without Shift.
    #[must_use]
    pub fn is_ctrl(&self, c: char) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
            && matches!(self.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Modifier keys. The bit layout is xterm's: a CSI modifier parameter
    /// is `1 + bits`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// A mouse report, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Press(MouseButton),
    Release(MouseButton),
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

// ─── Parser ─────────────────────────────────────────────────────────────────

const ESC: u8 = 0x1b;
const PASTE_END: &[u8] = b"\x1b[201~";

/// Outcome of decoding at the head of the buffer.
enum Step {
    /// An event and the number of bytes it used.
    Emit(Event, usize),
    /// Bytes that decode to nothing we report.
    Discard(usize),
    /// `CSI 200 ~` was seen; switch to paste collection.
    BeginPaste(usize),
    /// The head is a prefix of a longer sequence.
    NeedMore,
}

/// Incremental input decoder.
///
/// ```
/// use grid_term::input::{Event, KeyCode, KeyEvent, Parser};
///
/// let mut parser = Parser::new();
/// let events = parser.advance(b"a\x1b[A");
/// assert_eq!(
///     events,
///     [
///         Event::Key(KeyEvent::plain(KeyCode::Char('a'))),
///         Event::Key(KeyEvent::plain(KeyCode::Up)),
///     ]
/// );
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    pending: Vec<u8>,
    pasting: bool,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and decode as many complete events as possible.
    pub fn advance(&mut self, bytes: &[u8]) -> Vec<Event> {
        self.pending.extend_from_slice(bytes);
        let mut events = Vec::new();
        let mut at = 0;

        while at < self.pending.len() {
            let rest = &self.pending[at..];
            if self.pasting {
                let Some(end) = rest.windows(PASTE_END.len()).position(|w| w == PASTE_END)
                else {
                    break;
                };
                events.push(Event::Paste(String::from_utf8_lossy(&rest[..end]).into_owned()));
                at += end + PASTE_END.len();
                self.pasting = false;
                continue;
            }
            match decode(rest) {
                Step::Emit(event, used) => {
                    events.push(event);
                    at += used;
                }
                Step::Discard(used) => at += used,
                Step::BeginPaste(used) => {
                    self.pasting = true;
                    at += used;
                }
                Step::NeedMore => break,
            }
        }

        self.pending.drain(..at);
        events
    }

    /// Bytes are buffered waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Resolve whatever is buffered after the escape timeout.
    ///
    /// A lone ESC becomes the Escape key. An unfinished sequence is
    /// replayed as individual keys so nothing typed is silently lost.
    /// An unterminated paste is delivered as-is.
    pub fn flush(&mut self) -> Vec<Event> {
        let pending = std::mem::take(&mut self.pending);
        if std::mem::take(&mut self.pasting) {
            return vec![Event::Paste(String::from_utf8_lossy(&pending).into_owned())];
        }
        let mut events = Vec::new();
        let mut rest = pending.as_slice();
        while let Some((&lead, tail)) = rest.split_first() {
            if lead == ESC {
                events.push(key(KeyCode::Escape, Modifiers::empty()));
                rest = tail;
                continue;
            }
            match decode(rest) {
                Step::Emit(event, used) => {
                    events.push(event);
                    rest = &rest[used..];
                }
                // Truncated UTF-8 and the like.
                _ => rest = tail,
            }
        }
        events
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

/// Decode one event from the head of a non-empty buffer.
fn decode(buf: &[u8]) -> Step {
    match buf[0] {
        ESC => decode_escape(buf),
        lead => match control_key(lead) {
            Some(event) => Step::Emit(event, 1),
            None if lead.is_ascii() => {
                Step::Emit(key(KeyCode::Char(char::from(lead)), Modifiers::empty()), 1)
            }
            None => decode_utf8(buf),
        },
    }
}

/// Single-byte keys below 0x20, plus DEL.
fn control_key(byte: u8) -> Option<Event> {
    let event = match byte {
        b'\r' | b'\n' => key(KeyCode::Enter, Modifiers::empty()),
        b'\t' => key(KeyCode::Tab, Modifiers::empty()),
        0x08 | 0x7f => key(KeyCode::Backspace, Modifiers::empty()),
        0x00 => key(KeyCode::Char(' '), Modifiers::CTRL),
        0x01..=0x1a => key(KeyCode::Char(char::from(b'a' + byte - 1)), Modifiers::CTRL),
        0x1c..=0x1f => key(KeyCode::Char(char::from(b'4' + byte - 0x1c)), Modifiers::CTRL),
        _ => return None,
    };
    Some(event)
}

fn decode_escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        return Step::NeedMore;
    };
    match next {
        b'[' => decode_csi(buf),
        b'O' => decode_ss3(buf),
        ESC => Step::Emit(key(KeyCode::Escape, Modifiers::ALT), 2),
        _ => match decode(&buf[1..]) {
            Step::Emit(Event::Key(inner), used) => Step::Emit(
                Event::Key(KeyEvent::new(inner.code, inner.modifiers | Modifiers::ALT)),
                used + 1,
            ),
            Step::NeedMore => Step::NeedMore,
            _ => Step::Emit(key(KeyCode::Escape, Modifiers::empty()), 1),
        },
    }
}

fn decode_ss3(buf: &[u8]) -> Step {
    let Some(&last) = buf.get(2) else {
        return Step::NeedMore;
    };
    match letter_key(last) {
        Some(code) => Step::Emit(key(code, Modifiers::empty()), 3),
        None => Step::Discard(3),
    }
}

/// Final bytes shared by CSI and SS3 forms.
const fn letter_key(final_byte: u8) -> Option<KeyCode> {
    Some(match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return None,
    })
}

// Each arm's range keeps the result within F1..=F12.
#[allow(clippy::cast_possible_truncation)]
const fn tilde_key(number: u16) -> Option<KeyCode> {
    Some(match number {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        11..=15 => KeyCode::F((number - 10) as u8),
        17..=21 => KeyCode::F((number - 11) as u8),
        23 | 24 => KeyCode::F((number - 12) as u8),
        _ => return None,
    })
}

/// `ESC [ params final`. Parameter bytes are 0x30..=0x3F, intermediates
/// 0x20..=0x2F, and the final byte 0x40..=0x7E.
fn decode_csi(buf: &[u8]) -> Step {
    let body = &buf[2..];
    let Some(len) = body.iter().position(|b| !(0x20..=0x3f).contains(b)) else {
        return Step::NeedMore;
    };
    let used = 2 + len + 1;
    let final_byte = body[len];
    if !(0x40..=0x7e).contains(&final_byte) {
        return Step::Discard(2 + len);
    }
    let params = &body[..len];

    if let Some(mouse) = params.strip_prefix(b"<") {
        return decode_sgr_mouse(mouse, final_byte, used);
    }

    let mut numbers = params.split(|&b| b == b';').map(number);
    let first = numbers.next().unwrap_or(0);
    let modifiers = numbers.next().map_or(Modifiers::empty(), xterm_modifiers);

    match final_byte {
        b'I' if params.is_empty() => Step::Emit(Event::FocusGained, used),
        b'O' if params.is_empty() => Step::Emit(Event::FocusLost, used),
        b'Z' => Step::Emit(key(KeyCode::Tab, Modifiers::SHIFT | modifiers), used),
        b'~' if first == 200 => Step::BeginPaste(used),
        b'~' => tilde_key(first).map_or(Step::Discard(used), |code| {
            Step::Emit(key(code, modifiers), used)
        }),
        other => letter_key(other).map_or(Step::Discard(used), |code| {
            Step::Emit(key(code, modifiers), used)
        }),
    }
}

/// `ESC [ < button ; x ; y (M|m)`, coordinates 1-indexed.
fn decode_sgr_mouse(params: &[u8], final_byte: u8, used: usize) -> Step {
    let mut fields = params.split(|&b| b == b';').map(number);
    let (Some(code), Some(x), Some(y)) = (fields.next(), fields.next(), fields.next()) else {
        return Step::Discard(used);
    };

    // Motion reports, with or without a button held.
    if code & 32 != 0 {
        return Step::Discard(used);
    }

    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::SHIFT, code & 4 != 0);
    modifiers.set(Modifiers::ALT, code & 8 != 0);
    modifiers.set(Modifiers::CTRL, code & 16 != 0);

    let kind = if code & 64 != 0 {
        match code & 3 {
            0 => MouseKind::ScrollUp,
            1 => MouseKind::ScrollDown,
            // Horizontal wheel.
            _ => return Step::Discard(used),
        }
    } else {
        let button = match code & 3 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => return Step::Discard(used),
        };
        if final_byte == b'm' {
            MouseKind::Release(button)
        } else {
            MouseKind::Press(button)
        }
    };

    Step::Emit(
        Event::Mouse(MouseEvent {
            kind,
            x: x.saturating_sub(1),
            y: y.saturating_sub(1),
            modifiers,
        }),
        used,
    )
}

fn decode_utf8(buf: &[u8]) -> Step {
    let width = match buf[0] {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return Step::Discard(1),
    };
    let Some(bytes) = buf.get(..width) else {
        // Don't wait on bytes that can never complete a character.
        return if buf[1..].iter().all(|b| b & 0xc0 == 0x80) {
            Step::NeedMore
        } else {
            Step::Discard(1)
        };
    };
    match std::str::from_utf8(bytes).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Step::Emit(key(KeyCode::Char(ch), Modifiers::empty()), width),
        None => Step::Discard(1),
    }
}

/// A decimal CSI parameter. Empty or malformed counts as 0.
fn number(digits: &[u8]) -> u16 {
    digits.iter().take_while(|b| b.is_ascii_digit()).fold(0u16, |n, d| {
        n.saturating_mul(10).saturating_add(u16::from(d - b'0'))
    })
}

fn xterm_modifiers(param: u16) -> Modifiers {
    let bits = u8::try_from(param.saturating_sub(1)).unwrap_or(0);
    Modifiers::from_bits_truncate(bits)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
