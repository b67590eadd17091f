// SPDX-License-Identifier: MIT
//
// grid-term: Terminal backend for grid-game.
//
// Direct terminal control through ANSI escape sequences and raw termios:
// a byte-level input parser, a cell frame buffer, a differential renderer
// that only rewrites changed cells, and a single-threaded event loop that
// ties them together. No TUI framework sits between the board and the
// terminal.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod event_loop;
pub mod input;
pub mod render;
pub mod terminal;
