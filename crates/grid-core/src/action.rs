//! Normalized board actions.
//!
//! Every input source (keys, paste, mouse) is reduced to one of these before
//! it reaches [`GridState::apply`](crate::state::GridState::apply). The
//! transition logic never sees a terminal event.

use std::fmt;

use crate::coord::Coord;

/// An arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(d_row, d_col)` for one step.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write text from the focused cell onward.
    InsertText(String),
    /// Clear the focused cell and step back.
    DeleteBackward,
    /// Clear the focused cell and step forward.
    DeleteForward,
    /// Step focus one cell, wrapping within the row or column.
    MoveFocus(Direction),
    /// Focus a specific cell.
    SetFocus(Coord),
}

impl Action {
    /// Changes focus and nothing else. These still apply when the board is
    /// disabled.
    #[must_use]
    pub const fn is_focus_only(&self) -> bool {
        matches!(self, Self::SetFocus(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertText(text) => write!(f, "insert {text:?}"),
            Self::DeleteBackward => f.write_str("delete-backward"),
            Self::DeleteForward => f.write_str("delete-forward"),
            Self::MoveFocus(dir) => write!(f, "move {dir:?}"),
            Self::SetFocus(at) => write!(f, "focus {at}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_unit_steps() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let (r, c) = dir.delta();
            assert_eq!(r.abs() + c.abs(), 1, "{dir:?}");
        }
    }

    #[test]
    fn focus_classification() {
        assert!(Action::SetFocus(Coord::ORIGIN).is_focus_only());
        assert!(!Action::MoveFocus(Direction::Up).is_focus_only());
        assert!(!Action::InsertText("a".into()).is_focus_only());
    }

    #[test]
    fn display_for_logs() {
        assert_eq!(Action::InsertText("AB".into()).to_string(), "insert \"AB\"");
        assert_eq!(Action::MoveFocus(Direction::Left).to_string(), "move Left");
        assert_eq!(Action::SetFocus(Coord::new(0, 1)).to_string(), "focus 1:2");
        assert_eq!(Action::DeleteBackward.to_string(), "delete-backward");
    }
}
