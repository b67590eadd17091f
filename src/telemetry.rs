// SPDX-License-Identifier: MIT
//
// Logging setup. The TUI owns stdout and stderr while it runs, so logs only
// ever go to a file, through a non-blocking writer. Without a log file no
// subscriber is installed and every `tracing` macro is a no-op.

use std::fs::OpenOptions;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::cli::LogConfig;
use crate::error::AppError;

/// Keeps the background log writer alive. Dropping it flushes pending lines.
#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

impl TelemetryGuard {
    const fn disabled() -> Self {
        Self { _guard: None }
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Fails when the filter does not parse or the log file cannot be opened.
pub fn init(config: &LogConfig) -> Result<TelemetryGuard, AppError> {
    let filter = parse_filter(&config.filter)?;
    let Some(path) = &config.file else {
        return Ok(TelemetryGuard::disabled());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AppError::LogFile {
            path: path.clone(),
            source,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .try_init();
    if installed.is_err() {
        // Someone else owns the global subscriber.
        return Ok(TelemetryGuard::disabled());
    }

    Ok(TelemetryGuard {
        _guard: Some(guard),
    })
}

fn parse_filter(filter: &str) -> Result<EnvFilter, AppError> {
    EnvFilter::try_new(filter).map_err(|err| AppError::LogFilter {
        filter: filter.to_owned(),
        reason: err.to_string(),
    })
}
