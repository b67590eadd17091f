//! Board snapshots and the transition function.
//!
//! A [`GridState`] is the whole of what the board knows: cell contents, the
//! focused cell, and whether editing is disabled. [`GridState::apply`] maps
//! a snapshot and an [`Action`] to the next snapshot. It never fails and
//! never mutates its input; an action that means nothing in the current
//! state returns an equal snapshot, which the caller detects with `==`.
//!
//! Rules, in order:
//!
//! 1. A disabled board ignores everything except [`Action::SetFocus`].
//! 2. Without a focused cell, every action except `SetFocus` is ignored.
//! 3. Focus is always in range; `SetFocus` wraps its target.

use crate::action::{Action, Direction};
use crate::board::Board;
use crate::coord::{Coord, Dims};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    board: Board,
    focus: Option<Coord>,
    disabled: bool,
}

impl GridState {
    /// An empty, enabled, unfocused board.
    #[must_use]
    pub fn new(dims: Dims) -> Self {
        Self::from_board(Board::new(dims))
    }

    #[must_use]
    pub const fn from_board(board: Board) -> Self {
        Self {
            board,
            focus: None,
            disabled: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    #[must_use]
    pub const fn dims(&self) -> Dims {
        self.board.dims()
    }

    #[inline]
    #[must_use]
    pub const fn focus(&self) -> Option<Coord> {
        self.focus
    }

    #[inline]
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The same snapshot with the disabled flag set to `disabled`.
    #[must_use]
    pub fn with_disabled(&self, disabled: bool) -> Self {
        Self {
            disabled,
            ..self.clone()
        }
    }

    /// Empty every cell. Focus is kept; a disabled board is left alone.
    #[must_use]
    pub fn clear(&self) -> Self {
        if self.disabled {
            return self.clone();
        }
        Self {
            board: self.board.clear_all(),
            ..self.clone()
        }
    }

    /// The next snapshot after `action`.
    ///
    /// ```
    /// use grid_core::{Action, Coord, Dims, GridState};
    ///
    /// let state = GridState::new(Dims::new(4, 4).unwrap())
    ///     .apply(&Action::SetFocus(Coord::new(0, 0)))
    ///     .apply(&Action::InsertText("ab".into()));
    /// assert_eq!(state.focus(), Some(Coord::new(0, 2)));
    /// assert_eq!(state.board().to_text().lines().next(), Some("AB.."));
    /// ```
    #[must_use]
    pub fn apply(&self, action: &Action) -> Self {
        if self.disabled && !action.is_focus_only() {
            tracing::trace!(%action, "ignored: board disabled");
            return self.clone();
        }
        let dims = self.dims();

        match (action, self.focus) {
            (Action::SetFocus(target), _) => self.focused(dims.wrap_coord(*target)),
            (_, None) => {
                tracing::trace!(%action, "ignored: no focus");
                self.clone()
            }
            (Action::InsertText(text), Some(at)) => self.insert_at(text, at, true),
            (Action::DeleteBackward, Some(at)) => Self {
                board: self.board.delete(at),
                focus: Some(dims.prev(at)),
                disabled: false,
            },
            (Action::DeleteForward, Some(at)) => Self {
                board: self.board.delete(at),
                focus: Some(dims.next(at)),
                disabled: false,
            },
            (Action::MoveFocus(dir), Some(at)) => self.focused(step(dims, at, *dir)),
        }
    }

    /// Insert `text` at an explicit cell, focused or not.
    ///
    /// With `move_focus`, focus lands on the cell after the last one written.
    /// Without it, focus is left as it was. A disabled board is unchanged.
    #[must_use]
    pub fn insert_at(&self, text: &str, at: Coord, move_focus: bool) -> Self {
        if self.disabled {
            return self.clone();
        }
        let (board, end) = self.board.insert(text, at);
        if board == self.board && !move_focus {
            return self.clone();
        }
        Self {
            board,
            focus: if move_focus { Some(end) } else { self.focus },
            disabled: false,
        }
    }

    fn focused(&self, at: Coord) -> Self {
        Self {
            focus: Some(at),
            ..self.clone()
        }
    }
}

fn step(dims: Dims, at: Coord, dir: Direction) -> Coord {
    let (d_row, d_col) = dir.delta();
    dims.relative(at, d_row, d_col)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn four_by_four() -> GridState {
        GridState::new(Dims::new(4, 4).unwrap())
    }

    fn at(row: usize, col: usize) -> Coord {
        Coord::new(row, col)
    }

    fn focus_at(state: &GridState, row: usize, col: usize) -> GridState {
        state.apply(&Action::SetFocus(at(row, col)))
    }

    // -- Scenarios --

    #[test]
    fn typing_two_letters_advances_focus() {
        let s = focus_at(&four_by_four(), 0, 0).apply(&Action::InsertText("ab".into()));
        assert_eq!(s.board().get(at(0, 0)), Some('A'));
        assert_eq!(s.board().get(at(0, 1)), Some('B'));
        assert_eq!(s.focus(), Some(at(0, 2)));
    }

    #[test]
    fn typing_at_row_end_wraps_focus_to_next_row() {
        let s = focus_at(&four_by_four(), 0, 3).apply(&Action::InsertText("x".into()));
        assert_eq!(s.board().get(at(0, 3)), Some('X'));
        assert_eq!(s.focus(), Some(at(1, 0)));
    }

    #[test]
    fn backspace_clears_and_steps_back() {
        let s = focus_at(&four_by_four(), 0, 1)
            .apply(&Action::InsertText("q".into()))
            .apply(&Action::SetFocus(at(0, 1)))
            .apply(&Action::DeleteBackward);
        assert_eq!(s.board().get(at(0, 1)), None);
        assert_eq!(s.focus(), Some(at(0, 0)));
    }

    #[test]
    fn backspace_at_origin_wraps_to_last() {
        let s = focus_at(&four_by_four(), 0, 0).apply(&Action::DeleteBackward);
        assert_eq!(s.focus(), Some(at(3, 3)));
    }

    #[test]
    fn delete_forward_clears_and_steps_on() {
        let base = GridState::from_board(Board::with_preset(Dims::new(4, 4).unwrap(), "....Z").unwrap());
        let s = focus_at(&base, 1, 0).apply(&Action::DeleteForward);
        assert_eq!(s.board().get(at(1, 0)), None);
        assert_eq!(s.focus(), Some(at(1, 1)));
    }

    #[test]
    fn arrow_up_from_top_row_wraps_to_bottom() {
        let s = focus_at(&four_by_four(), 0, 2).apply(&Action::MoveFocus(Direction::Up));
        assert_eq!(s.focus(), Some(at(3, 2)));
    }

    #[test]
    fn arrow_right_wraps_within_row() {
        let s = focus_at(&four_by_four(), 2, 3).apply(&Action::MoveFocus(Direction::Right));
        assert_eq!(s.focus(), Some(at(2, 0)));
    }

    #[test]
    fn disabled_board_ignores_edits_and_moves() {
        let base = focus_at(&four_by_four(), 1, 1).with_disabled(true);
        for action in [
            Action::InsertText("a".into()),
            Action::DeleteBackward,
            Action::DeleteForward,
            Action::MoveFocus(Direction::Down),
        ] {
            assert_eq!(base.apply(&action), base, "{action}");
        }
        assert_eq!(base.insert_at("a", at(0, 0), true), base);
        assert_eq!(base.clear(), base);
    }

    #[test]
    fn disabled_board_still_takes_focus() {
        let s = four_by_four().with_disabled(true).apply(&Action::SetFocus(at(2, 2)));
        assert_eq!(s.focus(), Some(at(2, 2)));
        assert!(s.is_disabled());
    }

    #[test]
    fn unfocused_board_ignores_focus_relative_actions() {
        let base = four_by_four();
        for action in [
            Action::InsertText("a".into()),
            Action::DeleteBackward,
            Action::DeleteForward,
            Action::MoveFocus(Direction::Left),
        ] {
            assert_eq!(base.apply(&action), base, "{action}");
        }
    }

    #[test]
    fn set_focus_wraps_out_of_range() {
        let s = four_by_four().apply(&Action::SetFocus(at(5, 9)));
        assert_eq!(s.focus(), Some(at(1, 1)));
    }

    #[test]
    fn set_focus_never_touches_board() {
        let base = GridState::from_board(Board::with_preset(Dims::new(2, 2).unwrap(), "ab").unwrap());
        let s = base.apply(&Action::SetFocus(at(1, 1)));
        assert_eq!(s.board(), base.board());
    }

    #[test]
    fn empty_insert_is_a_noop() {
        let base = focus_at(&four_by_four(), 1, 1);
        assert_eq!(base.apply(&Action::InsertText("\n".into())), base);
    }

    #[test]
    fn insert_at_without_focus_move() {
        let base = focus_at(&four_by_four(), 3, 3);
        let s = base.insert_at("hi", at(0, 0), false);
        assert_eq!(s.board().get(at(0, 1)), Some('I'));
        assert_eq!(s.focus(), Some(at(3, 3)));
    }

    #[test]
    fn insert_at_with_focus_move_needs_no_prior_focus() {
        let s = four_by_four().insert_at("hi", at(2, 3), true);
        assert_eq!(s.board().get(at(3, 0)), Some('I'));
        assert_eq!(s.focus(), Some(at(3, 1)));
    }

    #[test]
    fn clear_empties_board_keeps_focus() {
        let s = focus_at(&four_by_four(), 0, 0)
            .apply(&Action::InsertText("abc".into()))
            .clear();
        assert_eq!(s.board().filled_count(), 0);
        assert_eq!(s.focus(), Some(at(0, 3)));
    }

    #[test]
    fn apply_leaves_original_snapshot() {
        let before = focus_at(&four_by_four(), 0, 0);
        let _ = before.apply(&Action::InsertText("abc".into()));
        assert_eq!(before.board().filled_count(), 0);
        assert_eq!(before.focus(), Some(at(0, 0)));
    }

    // -- Properties --

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            "[a-z]{0,5}".prop_map(Action::InsertText),
            Just(Action::DeleteBackward),
            Just(Action::DeleteForward),
            prop_oneof![
                Just(Direction::Up),
                Just(Direction::Down),
                Just(Direction::Left),
                Just(Direction::Right),
            ]
            .prop_map(Action::MoveFocus),
            (0usize..20, 0usize..20).prop_map(|(r, c)| Action::SetFocus(Coord::new(r, c))),
        ]
    }

    proptest! {
        #[test]
        fn focus_stays_in_bounds(rows in 1usize..6, cols in 1usize..6, actions in prop::collection::vec(action(), 0..40)) {
            let mut state = GridState::new(Dims::new(rows, cols).unwrap());
            for a in &actions {
                state = state.apply(a);
                if let Some(f) = state.focus() {
                    prop_assert!(state.dims().contains(f));
                }
            }
        }

        #[test]
        fn disabled_only_moves_focus(actions in prop::collection::vec(action(), 0..20)) {
            let start = four_by_four().insert_at("seed", at(0, 0), false).with_disabled(true);
            let mut state = start.clone();
            for a in &actions {
                state = state.apply(a);
            }
            prop_assert_eq!(state.board(), start.board());
        }
    }
}
