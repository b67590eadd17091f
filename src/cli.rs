// SPDX-License-Identifier: MIT
//
// Command-line surface. Every flag has an environment fallback so the
// board can be configured from a shell profile.

use std::path::PathBuf;

use clap::Parser;
use grid_core::{Board, Dims, GridState};

use crate::error::AppError;

/// Largest board side accepted on the command line.
const MAX_SIDE: u16 = 64;

#[derive(Debug, Parser)]
#[command(name = "grid-game", version, about = "A wrapping letter grid in the terminal")]
pub struct Cli {
    /// Number of board rows.
    #[arg(long, env = "GRID_GAME_ROWS", default_value_t = 4,
          value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_SIDE)))]
    pub rows: u16,

    /// Number of board columns.
    #[arg(long, env = "GRID_GAME_COLS", default_value_t = 4,
          value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_SIDE)))]
    pub cols: u16,

    /// Start with editing disabled (focus still moves).
    #[arg(long, env = "GRID_GAME_DISABLED")]
    pub disabled: bool,

    /// Pre-fill the board in reading order; `.` leaves a cell empty.
    #[arg(long, env = "GRID_GAME_PRESET")]
    pub preset: Option<String>,

    /// Write logs to this file. Without it nothing is logged.
    #[arg(long, env = "GRID_GAME_LOG")]
    pub log_file: Option<PathBuf>,

    /// Log filter, in `RUST_LOG` syntax.
    #[arg(long, env = "GRID_GAME_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub filter: String,
}

/// Validated startup configuration.
#[derive(Debug)]
pub struct Config {
    pub initial: GridState,
    pub log: LogConfig,
}

impl Cli {
    /// Check the arguments and build the starting board.
    ///
    /// # Errors
    ///
    /// Fails when the preset does not fit the board.
    pub fn into_config(self) -> Result<Config, AppError> {
        let dims = Dims::new(usize::from(self.rows), usize::from(self.cols))?;
        let board = match self.preset.as_deref() {
            Some(preset) => Board::with_preset(dims, preset)?,
            None => Board::new(dims),
        };
        Ok(Config {
            initial: GridState::from_board(board).with_disabled(self.disabled),
            log: LogConfig {
                file: self.log_file,
                filter: self.log_level,
            },
        })
    }
}
