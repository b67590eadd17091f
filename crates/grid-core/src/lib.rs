//! # grid-core: board core for grid-game
//!
//! Everything about the board that does not touch a terminal:
//!
//! - **[`coord`]**: `Coord` and `Dims`, with wrapping typewriter arithmetic
//! - **[`board`]**: copy-on-write grid of single-character cells
//! - **[`action`]**: the normalized edit/navigation vocabulary
//! - **[`state`]**: `GridState` snapshots and the pure `apply` transition
//! - **[`normalize`]**: terminal events and raw text into actions
//! - **[`layout`]**: where each cell sits on screen, and hit testing
//! - **[`view`]**: painting a snapshot into a frame buffer
//!
//! Transitions never fail. Errors only come out of constructors, as
//! [`GridError`].

pub mod action;
pub mod board;
pub mod coord;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod state;
pub mod view;

pub use action::{Action, Direction};
pub use board::Board;
pub use coord::{Coord, Dims};
pub use error::GridError;
pub use layout::Layout;
pub use state::GridState;
