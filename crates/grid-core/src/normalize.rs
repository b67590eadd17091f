//! Input normalization.
//!
//! Two layers:
//!
//! - [`normalize_text`] turns raw typed or pasted text into the characters
//!   that will occupy cells, one per grapheme.
//! - [`normalize`] turns a decoded terminal [`Event`] into at most one
//!   [`Action`]. Which event means what lives here and nowhere else.
//!
//! Host shortcuts (quit, clear, toggle disabled) are the caller's business
//! and must be intercepted before events get here.

use grid_term::buffer::char_width;
use grid_term::input::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseKind};
use unicode_segmentation::UnicodeSegmentation;

use crate::action::{Action, Direction};
use crate::layout::Layout;
use crate::state::GridState;

/// The characters `text` writes into cells, in order.
///
/// Uppercases first (which may lengthen the text, `ß` becomes `SS`), then
/// keeps the base character of each extended grapheme cluster so a letter
/// with combining marks takes a single cell. Anything that occupies no
/// screen column (controls, format characters, stray combining marks) is
/// dropped.
///
/// ```
/// use grid_core::normalize::normalize_text;
///
/// assert_eq!(normalize_text("ab c"), ['A', 'B', ' ', 'C']);
/// assert_eq!(normalize_text("stra\u{df}e"), ['S', 'T', 'R', 'A', 'S', 'S', 'E']);
/// assert_eq!(normalize_text("line\n"), ['L', 'I', 'N', 'E']);
/// ```
#[must_use]
pub fn normalize_text(text: &str) -> Vec<char> {
    text.to_uppercase()
        .graphemes(true)
        .filter_map(|g| g.chars().find(|&ch| char_width(ch) > 0))
        .collect()
}

/// The action `event` stands for in `state`, if any.
///
/// `layout` resolves mouse positions to cells.
#[must_use]
pub fn normalize(event: &Event, state: &GridState, layout: &Layout) -> Option<Action> {
    match event {
        Event::Key(key) => key_action(*key, state),
        Event::Paste(text) => text_action(text),
        Event::Mouse(mouse) => match mouse.kind {
            MouseKind::Press(MouseButton::Left) => {
                layout.cell_at(mouse.x, mouse.y).map(Action::SetFocus)
            }
            _ => None,
        },
        Event::FocusGained | Event::FocusLost => None,
    }
}

fn key_action(key: KeyEvent, state: &GridState) -> Option<Action> {
    let dims = state.dims();
    let action = match key.code {
        KeyCode::Backspace => Action::DeleteBackward,
        KeyCode::Delete => Action::DeleteForward,
        KeyCode::Up => Action::MoveFocus(Direction::Up),
        KeyCode::Down => Action::MoveFocus(Direction::Down),
        KeyCode::Left => Action::MoveFocus(Direction::Left),
        KeyCode::Right => Action::MoveFocus(Direction::Right),
        KeyCode::Tab if key.modifiers.contains(Modifiers::SHIFT) => {
            Action::SetFocus(state.focus().map_or_else(|| dims.last(), |at| dims.prev(at)))
        }
        KeyCode::Tab => {
            Action::SetFocus(state.focus().map_or_else(|| dims.first(), |at| dims.next(at)))
        }
        KeyCode::Char(ch) if !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => {
            let mut buf = [0u8; 4];
            return text_action(ch.encode_utf8(&mut buf));
        }
        _ => return None,
    };
    Some(action)
}

fn text_action(text: &str) -> Option<Action> {
    (!normalize_text(text).is_empty()).then(|| Action::InsertText(text.to_owned()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{Coord, Dims};
    use grid_term::input::MouseEvent;
    use grid_term::terminal::Size;
    use pretty_assertions::assert_eq;

    fn setup() -> (GridState, Layout) {
        let dims = Dims::new(4, 4).unwrap();
        let layout = Layout::compute(dims, Size { cols: 80, rows: 24 });
        (GridState::new(dims), layout)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn key_mod(code: KeyCode, modifiers: Modifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn mouse(kind: MouseKind, x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            x,
            y,
            modifiers: Modifiers::empty(),
        })
    }

    // -- Text --

    #[test]
    fn text_uppercases() {
        assert_eq!(normalize_text("abc"), ['A', 'B', 'C']);
        assert_eq!(normalize_text("é"), ['É']);
    }

    #[test]
    fn text_keeps_base_of_combining_sequence() {
        assert_eq!(normalize_text("e\u{301}x"), ['E', 'X']);
    }

    #[test]
    fn text_drops_controls_keeps_spaces() {
        assert_eq!(normalize_text("a\tb\r\n c"), ['A', 'B', ' ', 'C']);
        assert!(normalize_text("\n\n").is_empty());
        assert!(normalize_text("").is_empty());
    }

    #[test]
    fn text_drops_zero_width() {
        assert!(normalize_text("\u{200B}").is_empty());
        assert!(normalize_text("\u{FEFF}").is_empty());
        assert!(normalize_text("\u{301}").is_empty());
        assert_eq!(normalize_text("a\u{200B}b\u{FEFF}"), ['A', 'B']);
    }

    #[test]
    fn zero_width_paste_is_ignored() {
        let (state, layout) = setup();
        assert_eq!(normalize(&Event::Paste("\u{200B}\u{301}".into()), &state, &layout), None);
        assert_eq!(normalize(&key(KeyCode::Char('\u{FEFF}')), &state, &layout), None);
    }

    #[test]
    fn text_wide_and_emoji() {
        assert_eq!(normalize_text("中🦀"), ['中', '🦀']);
    }

    // -- Keys --

    #[test]
    fn editing_keys() {
        let (state, layout) = setup();
        assert_eq!(normalize(&key(KeyCode::Backspace), &state, &layout), Some(Action::DeleteBackward));
        assert_eq!(normalize(&key(KeyCode::Delete), &state, &layout), Some(Action::DeleteForward));
    }

    #[test]
    fn arrows_move_focus() {
        let (state, layout) = setup();
        for (code, dir) in [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
        ] {
            assert_eq!(normalize(&key(code), &state, &layout), Some(Action::MoveFocus(dir)));
        }
    }

    #[test]
    fn printable_chars_insert() {
        let (state, layout) = setup();
        assert_eq!(
            normalize(&key(KeyCode::Char('a')), &state, &layout),
            Some(Action::InsertText("a".into()))
        );
        assert_eq!(
            normalize(&key_mod(KeyCode::Char('A'), Modifiers::SHIFT), &state, &layout),
            Some(Action::InsertText("A".into()))
        );
        assert_eq!(
            normalize(&key(KeyCode::Char(' ')), &state, &layout),
            Some(Action::InsertText(" ".into()))
        );
    }

    #[test]
    fn ctrl_and_alt_chars_are_ignored() {
        let (state, layout) = setup();
        assert_eq!(normalize(&key_mod(KeyCode::Char('x'), Modifiers::CTRL), &state, &layout), None);
        assert_eq!(normalize(&key_mod(KeyCode::Char('x'), Modifiers::ALT), &state, &layout), None);
    }

    #[test]
    fn other_keys_are_ignored() {
        let (state, layout) = setup();
        for code in [KeyCode::Enter, KeyCode::Escape, KeyCode::Home, KeyCode::F(1), KeyCode::PageUp] {
            assert_eq!(normalize(&key(code), &state, &layout), None, "{code:?}");
        }
    }

    #[test]
    fn tab_cycles_focus() {
        let (state, layout) = setup();
        assert_eq!(
            normalize(&key(KeyCode::Tab), &state, &layout),
            Some(Action::SetFocus(Coord::new(0, 0)))
        );
        assert_eq!(
            normalize(&key_mod(KeyCode::Tab, Modifiers::SHIFT), &state, &layout),
            Some(Action::SetFocus(Coord::new(3, 3)))
        );

        let focused = state.apply(&Action::SetFocus(Coord::new(0, 3)));
        assert_eq!(
            normalize(&key(KeyCode::Tab), &focused, &layout),
            Some(Action::SetFocus(Coord::new(1, 0)))
        );
        assert_eq!(
            normalize(&key_mod(KeyCode::Tab, Modifiers::SHIFT), &focused, &layout),
            Some(Action::SetFocus(Coord::new(0, 2)))
        );
    }

    // -- Paste, mouse, focus --

    #[test]
    fn paste_inserts_whole_text() {
        let (state, layout) = setup();
        assert_eq!(
            normalize(&Event::Paste("hello".into()), &state, &layout),
            Some(Action::InsertText("hello".into()))
        );
        assert_eq!(normalize(&Event::Paste("\r\n".into()), &state, &layout), None);
    }

    #[test]
    fn left_click_on_cell_focuses_it() {
        let (state, layout) = setup();
        let (x, y) = layout.cell_origin(Coord::new(2, 1)).unwrap();
        assert_eq!(
            normalize(&mouse(MouseKind::Press(MouseButton::Left), x, y), &state, &layout),
            Some(Action::SetFocus(Coord::new(2, 1)))
        );
    }

    #[test]
    fn other_mouse_events_are_ignored() {
        let (state, layout) = setup();
        let (x, y) = layout.cell_origin(Coord::new(0, 0)).unwrap();
        for kind in [
            MouseKind::Press(MouseButton::Right),
            MouseKind::Release(MouseButton::Left),
            MouseKind::ScrollUp,
        ] {
            assert_eq!(normalize(&mouse(kind, x, y), &state, &layout), None);
        }
        assert_eq!(normalize(&mouse(MouseKind::Press(MouseButton::Left), 0, 0), &state, &layout), None);
    }

    #[test]
    fn focus_events_are_ignored() {
        let (state, layout) = setup();
        assert_eq!(normalize(&Event::FocusGained, &state, &layout), None);
        assert_eq!(normalize(&Event::FocusLost, &state, &layout), None);
    }
}
