// SPDX-License-Identifier: MIT
//
// Top-level error type. Everything that can stop the app before or after
// the event loop ends up here and is printed once by `main`.

use std::io;
use std::path::PathBuf;

use grid_core::GridError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("stdin is not a terminal")]
    NotATty,

    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid log filter {filter:?}: {reason}")]
    LogFilter { filter: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_errors_pass_through() {
        let err = AppError::from(GridError::PresetTooLong { len: 20, capacity: 16 });
        assert_eq!(err.to_string(), "preset has 20 cells but the board only holds 16");
    }

    #[test]
    fn log_file_error_names_path() {
        let err = AppError::LogFile {
            path: PathBuf::from("/nope/grid.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "cannot open log file /nope/grid.log: missing");
    }

    #[test]
    fn io_errors_are_terminal_errors() {
        let err: AppError = io::Error::other("broken pipe").into();
        assert_eq!(err.to_string(), "terminal error: broken pipe");
    }
}
