// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop.
//
// One thread: poll stdin, decode, hand events to the app, repaint if the
// app says something changed. No reader thread and no tick. The board only
// changes in response to input or a resize, so between keystrokes the
// process sleeps in poll(2).
//
// Timeouts:
//
//   - While the parser holds a partial sequence (usually a lone ESC), poll
//     waits `escape_timeout_ms`. If nothing arrives the pending bytes are
//     flushed as plain keys.
//   - Otherwise poll waits `idle_timeout_ms`, a backstop for a SIGWINCH
//     that lands between the resize check and the poll call. Normally the
//     signal interrupts poll with EINTR and the resize is handled at once.

use std::io::{self, Write};

use crate::ansi::{self, CursorShape};
use crate::buffer::FrameBuffer;
use crate::input::{Event, Parser};
use crate::render::Renderer;
use crate::terminal::{self, Size, Terminal};

// ─── App ─────────────────────────────────────────────────────────────────────

/// What the app wants after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Nothing visible changed.
    #[default]
    Unchanged,
    /// Repaint before the next wait.
    Redraw,
    /// Leave the loop.
    Quit,
}

/// The application side of the loop.
pub trait App {
    /// Handle one decoded input event.
    fn on_event(&mut self, event: &Event) -> Flow;

    /// The window size changed. A repaint always follows.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the whole UI. The buffer is cleared and sized to the terminal.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where the hardware cursor should rest, or `None` to hide it.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

/// Feed `events` to `app` in order and fold the results.
///
/// Stops at the first [`Flow::Quit`]; later events are not delivered.
pub fn dispatch(app: &mut impl App, events: &[Event]) -> Flow {
    let mut flow = Flow::Unchanged;
    for event in events {
        match app.on_event(event) {
            Flow::Quit => return Flow::Quit,
            Flow::Redraw => flow = Flow::Redraw,
            Flow::Unchanged => {}
        }
    }
    flow
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// How long a partial escape sequence may wait for its next byte.
    pub escape_timeout_ms: u16,
    /// Upper bound on one idle wait.
    pub idle_timeout_ms: u16,
    /// Cursor shape used while the loop runs.
    pub cursor_shape: CursorShape,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            escape_timeout_ms: 25,
            idle_timeout_ms: 500,
            cursor_shape: CursorShape::SteadyUnderline,
        }
    }
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// The frame buffer plus the renderer that diffs it onto the terminal.
#[derive(Debug)]
pub struct Screen {
    frame: FrameBuffer,
    renderer: Renderer,
}

impl Screen {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            frame: FrameBuffer::new(size.cols, size.rows),
            renderer: Renderer::new(),
        }
    }

    /// Resize the frame and schedule a full repaint.
    pub fn resize(&mut self, size: Size) {
        self.frame.resize(size.cols, size.rows);
        self.renderer.force_redraw();
    }

    /// Repaint `app` and write the changed cells to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn draw(&mut self, app: &mut impl App, out: &mut impl Write) -> io::Result<()> {
        self.frame.clear();
        app.paint(&mut self.frame);
        let stats = self.renderer.render(&self.frame, app.cursor());
        tracing::trace!(
            rendered = stats.cells_rendered,
            skipped = stats.cells_skipped,
            bytes = stats.bytes_written,
            "frame"
        );
        self.renderer.flush_to(out)
    }

    #[must_use]
    pub const fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal session and drives an [`App`].
///
/// ```no_run
/// use grid_term::buffer::FrameBuffer;
/// use grid_term::event_loop::{App, EventLoop, Flow};
/// use grid_term::input::{Event, KeyCode};
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_event(&mut self, event: &Event) -> Flow {
///         match event {
///             Event::Key(key) if key.code == KeyCode::Char('q') => Flow::Quit,
///             _ => Flow::Unchanged,
///         }
///     }
///
///     fn paint(&mut self, buf: &mut FrameBuffer) {
///         buf.paint_text(0, 0, "press q", Default::default());
///     }
/// }
///
/// EventLoop::new().run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    config: LoopConfig,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter the terminal, run until the app quits or stdin closes, then
    /// restore the terminal whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first terminal, read, or write error.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        let result = self.run_inner(app);
        let restored = self.terminal.leave();
        result.and(restored)
    }

    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        let size = self.terminal.refresh_size();
        app.on_resize(size);
        let mut screen = Screen::new(size);
        ansi::set_cursor_shape(&mut io::stdout().lock(), self.config.cursor_shape)?;
        screen.draw(app, &mut io::stdout().lock())?;

        let mut buf = [0u8; 4096];
        loop {
            let timeout = if self.parser.has_pending() {
                self.config.escape_timeout_ms
            } else {
                self.config.idle_timeout_ms
            };

            let events = match read_stdin(&mut buf, timeout)? {
                Input::Bytes(n) => self.parser.advance(&buf[..n]),
                Input::Timeout if self.parser.has_pending() => self.parser.flush(),
                Input::Timeout => Vec::new(),
                Input::Closed => {
                    tracing::debug!("stdin closed");
                    return Ok(());
                }
            };

            let mut flow = dispatch(app, &events);
            if flow == Flow::Quit {
                return Ok(());
            }

            if terminal::take_resize() {
                let size = self.terminal.refresh_size();
                tracing::debug!(cols = size.cols, rows = size.rows, "resize");
                screen.resize(size);
                app.on_resize(size);
                flow = Flow::Redraw;
            }

            if flow == Flow::Redraw {
                screen.draw(app, &mut io::stdout().lock())?;
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stdin ───────────────────────────────────────────────────────────────────

enum Input {
    Bytes(usize),
    Timeout,
    Closed,
}

/// Wait up to `timeout_ms` for stdin, then read what is available.
///
/// Reads go straight to fd 0: `io::stdin()` is buffered, and bytes parked
/// in its buffer would be invisible to the next poll.
#[cfg(unix)]
fn read_stdin(buf: &mut [u8], timeout_ms: u16) -> io::Result<Input> {
    let mut fds = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    // SAFETY: one valid pollfd.
    let ready = unsafe { libc::poll(&raw mut fds, 1, libc::c_int::from(timeout_ms)) };
    if ready < 0 {
        let err = io::Error::last_os_error();
        // A signal, usually SIGWINCH.
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(Input::Timeout)
        } else {
            Err(err)
        };
    }
    if ready == 0 {
        return Ok(Input::Timeout);
    }

    // SAFETY: `buf` is valid for `buf.len()` bytes.
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    match n {
        0 => Ok(Input::Closed),
        n if n > 0 => Ok(Input::Bytes(n.unsigned_abs())),
        _ => {
            let err = io::Error::last_os_error();
            if matches!(err.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) {
                Ok(Input::Timeout)
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(not(unix))]
fn read_stdin(_buf: &mut [u8], _timeout_ms: u16) -> io::Result<Input> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "terminal input requires a unix tty",
    ))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Style;
    use crate::input::{KeyCode, KeyEvent};

    /// Counts keys, quits on 'q', ignores focus events.
    #[derive(Default)]
    struct Counter {
        keys: usize,
        resized: Option<Size>,
    }

    impl App for Counter {
        fn on_event(&mut self, event: &Event) -> Flow {
            match event {
                Event::Key(key) if key.code == KeyCode::Char('q') => Flow::Quit,
                Event::Key(_) => {
                    self.keys += 1;
                    Flow::Redraw
                }
                _ => Flow::Unchanged,
            }
        }

        fn on_resize(&mut self, size: Size) {
            self.resized = Some(size);
        }

        fn paint(&mut self, buf: &mut FrameBuffer) {
            buf.paint_text(0, 0, &self.keys.to_string(), Style::PLAIN);
        }

        fn cursor(&self) -> Option<(u16, u16)> {
            Some((1, 0))
        }
    }

    fn chr(c: char) -> Event {
        Event::Key(KeyEvent::plain(KeyCode::Char(c)))
    }

    #[test]
    fn default_config() {
        let config = LoopConfig::default();
        assert_eq!(config.escape_timeout_ms, 25);
        assert!(config.idle_timeout_ms > config.escape_timeout_ms);
        assert_eq!(config.cursor_shape, CursorShape::SteadyUnderline);
    }

    #[test]
    fn dispatch_nothing_is_unchanged() {
        assert_eq!(dispatch(&mut Counter::default(), &[]), Flow::Unchanged);
    }

    #[test]
    fn dispatch_focus_only_is_unchanged() {
        let mut app = Counter::default();
        assert_eq!(dispatch(&mut app, &[Event::FocusGained]), Flow::Unchanged);
    }

    #[test]
    fn dispatch_any_redraw_wins() {
        let mut app = Counter::default();
        let flow = dispatch(&mut app, &[Event::FocusLost, chr('a'), Event::FocusGained]);
        assert_eq!(flow, Flow::Redraw);
        assert_eq!(app.keys, 1);
    }

    #[test]
    fn dispatch_stops_at_quit() {
        let mut app = Counter::default();
        let flow = dispatch(&mut app, &[chr('a'), chr('q'), chr('b')]);
        assert_eq!(flow, Flow::Quit);
        assert_eq!(app.keys, 1);
    }

    #[test]
    fn screen_draw_paints_and_places_cursor() {
        let mut screen = Screen::new(Size { cols: 4, rows: 2 });
        let mut app = Counter { keys: 7, ..Counter::default() };
        let mut out = Vec::new();
        screen.draw(&mut app, &mut out).unwrap();

        assert_eq!(screen.frame().get(0, 0).unwrap().ch, '7');
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('7'));
        assert!(text.contains("\x1b[1;2H\x1b[?25h"));
    }

    #[test]
    fn screen_second_draw_is_incremental() {
        let mut screen = Screen::new(Size { cols: 4, rows: 2 });
        let mut app = Counter::default();
        screen.draw(&mut app, &mut Vec::new()).unwrap();

        app.keys = 1;
        let mut out = Vec::new();
        screen.draw(&mut app, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("\x1b[2J"));
        assert!(text.contains("\x1b[1;1H\x1b[0m1"));
    }

    #[test]
    fn screen_resize_redraws_everything() {
        let mut screen = Screen::new(Size { cols: 4, rows: 2 });
        let mut app = Counter::default();
        screen.draw(&mut app, &mut Vec::new()).unwrap();

        screen.resize(Size { cols: 6, rows: 3 });
        let mut out = Vec::new();
        screen.draw(&mut app, &mut out).unwrap();
        assert_eq!(screen.frame().width(), 6);
        assert!(String::from_utf8(out).unwrap().contains("\x1b[2J"));
    }

    #[test]
    fn app_default_cursor_is_hidden() {
        struct Blank;
        impl App for Blank {
            fn on_event(&mut self, _: &Event) -> Flow {
                Flow::Unchanged
            }
            fn paint(&mut self, _: &mut FrameBuffer) {}
        }
        assert!(Blank.cursor().is_none());
        let mut app = Counter::default();
        app.on_resize(Size { cols: 9, rows: 9 });
        assert_eq!(app.resized, Some(Size { cols: 9, rows: 9 }));
    }
}
