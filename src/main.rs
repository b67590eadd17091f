// SPDX-License-Identifier: MIT
//
// grid-game: a wrapping letter grid in the terminal.
//
// This is the main binary that wires the two crates together:
//
//   grid-term → terminal control, rendering, input parsing, event loop
//   grid-core → board state, actions, normalization, layout, view
//
// GridApp implements grid-term's App trait. Each input flows through:
//
//   stdin → parser → on_event → host keys | normalize → apply → snapshot
//   paint → view::render → framebuffer → diff renderer → terminal
//
// Host keys (quit, lock, clear) are handled here and never reach the
// normalizer. Everything else becomes at most one Action.

mod cli;
mod error;
mod telemetry;

use std::process;

use clap::Parser;
use grid_core::{GridState, Layout, normalize, view};
use grid_term::buffer::FrameBuffer;
use grid_term::event_loop::{App, EventLoop, Flow};
use grid_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use grid_term::terminal::{self, Size};

use crate::cli::Cli;
use crate::error::AppError;

// ─── App ────────────────────────────────────────────────────────────────────

/// The board app: the current snapshot plus where it sits on screen.
struct GridApp {
    state: GridState,
    layout: Layout,
}

/// Shortcuts owned by the host rather than the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostKey {
    Quit,
    ToggleDisabled,
    Clear,
}

impl HostKey {
    fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.is_ctrl('c') || key.is_ctrl('q') {
            Some(Self::Quit)
        } else if key.is_ctrl('d') {
            Some(Self::ToggleDisabled)
        } else if key.is_ctrl('l') {
            Some(Self::Clear)
        } else {
            None
        }
    }
}

impl GridApp {
    fn new(state: GridState, screen: Size) -> Self {
        let layout = Layout::compute(state.dims(), screen);
        Self { state, layout }
    }

    /// Swap in `next`, reporting whether anything visible changed.
    fn commit(&mut self, next: GridState) -> Flow {
        if next == self.state {
            return Flow::Unchanged;
        }
        self.state = next;
        Flow::Redraw
    }

    fn host_key(&mut self, host: HostKey) -> Flow {
        match host {
            HostKey::Quit => Flow::Quit,
            HostKey::ToggleDisabled => {
                let disabled = !self.state.is_disabled();
                tracing::debug!(disabled, "toggle editing");
                self.commit(self.state.with_disabled(disabled))
            }
            HostKey::Clear => {
                tracing::debug!("clear board");
                self.commit(self.state.clear())
            }
        }
    }
}

impl App for GridApp {
    fn on_event(&mut self, event: &Event) -> Flow {
        if let Event::Key(key) = event {
            if let Some(host) = HostKey::from_key(key) {
                return self.host_key(host);
            }
            // Remaining Ctrl chords mean nothing to the board either.
            if matches!(key.code, KeyCode::Char(_)) && key.modifiers.contains(Modifiers::CTRL) {
                return Flow::Unchanged;
            }
        }

        let Some(action) = normalize::normalize(event, &self.state, &self.layout) else {
            return Flow::Unchanged;
        };
        let next = self.state.apply(&action);
        tracing::debug!(%action, focus = ?next.focus(), "apply");
        self.commit(next)
    }

    fn on_resize(&mut self, size: Size) {
        self.layout = Layout::compute(self.state.dims(), size);
        if !self.layout.fits() {
            let (cols, rows) = Layout::min_screen(self.state.dims());
            tracing::warn!(
                have_cols = size.cols,
                have_rows = size.rows,
                need_cols = cols,
                need_rows = rows,
                "terminal too small for board"
            );
        }
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        view::render(&self.state, &self.layout, buf);
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        view::cursor(&self.state, &self.layout)
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run(cli: Cli) -> Result<String, AppError> {
    let config = cli.into_config()?;
    let _telemetry = telemetry::init(&config.log)?;

    if !terminal::is_tty() {
        return Err(AppError::NotATty);
    }

    let dims = config.initial.dims();
    tracing::info!(rows = dims.rows(), cols = dims.cols(), "starting");

    let mut event_loop = EventLoop::new();
    let mut app = GridApp::new(config.initial, event_loop.size());
    event_loop.run(&mut app)?;

    let board = app.state.board();
    tracing::info!(filled = board.filled_count(), "exiting");
    Ok(board.to_text())
}

fn main() {
    match run(Cli::parse()) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("grid-game: {e}");
            process::exit(1);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
