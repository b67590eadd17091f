// SPDX-License-Identifier: MIT
//
// Terminal session: raw mode, alternate screen, input reporting modes, and
// window-size tracking.
//
// Unsafe is confined to this module and `event_loop.rs`: termios, ioctl,
// isatty, sigaction, and one raw write used by the panic hook. There is no
// safe std interface for any of them.
#![allow(unsafe_code)]
//
// `Terminal::enter` puts the tty into raw mode and turns on click reporting,
// bracketed paste, and focus events. Everything is undone by `leave`, by
// `Drop`, and by the panic hook, which writes a fixed restore string
// straight to fd 1 so a panic while stdout is locked cannot deadlock.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Fallback when the size cannot be queried.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

/// Query the window size of stdout (`TIOCGWINSZ`).
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    // SAFETY: winsize is plain data and ioctl only writes into it.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    // SAFETY: isatty has no preconditions.
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Resize Signal ──────────────────────────────────────────────────────────

static RESIZED: AtomicBool = AtomicBool::new(false);
static SIGWINCH_INSTALLED: Once = Once::new();

#[cfg(unix)]
extern "C" fn on_sigwinch(_: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

/// Route `SIGWINCH` into a flag read by [`take_resize`].
///
/// The handler only stores an atomic, which is async-signal-safe.
pub fn watch_resize() {
    SIGWINCH_INSTALLED.call_once(|| {
        #[cfg(unix)]
        // SAFETY: `on_sigwinch` is async-signal-safe and lives for the
        // whole process.
        unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = on_sigwinch as extern "C" fn(libc::c_int) as libc::sighandler_t;
            libc::sigemptyset(&raw mut action.sa_mask);
            action.sa_flags = 0;
            if libc::sigaction(libc::SIGWINCH, &raw const action, std::ptr::null_mut()) != 0 {
                tracing::warn!(error = %io::Error::last_os_error(), "SIGWINCH handler not installed");
            }
        }
    });
}

/// Whether the window changed size since the last call.
pub fn take_resize() -> bool {
    RESIZED.swap(false, Ordering::Relaxed)
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Everything `enter` turns on, turned off. Leaving the alternate screen
/// comes last so the shell's screen reappears clean.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?1006l\x1b[?1000l\
    \x1b[?2004l\
    \x1b[?1004l\
    \x1b[0m\
    \x1b[0 q\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            write_emergency_restore();
            #[cfg(unix)]
            if let Ok(guard) = TERMIOS_BACKUP.lock() {
                if let Some(original) = guard.as_ref() {
                    // SAFETY: `original` came from tcgetattr on this fd.
                    unsafe {
                        libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
                    }
                }
            }
            previous(info);
        }));
    });
}

fn write_emergency_restore() {
    #[cfg(unix)]
    // SAFETY: writes a static buffer to fd 1; the result is ignored.
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }
    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        out.write_all(EMERGENCY_RESTORE).ok();
        out.flush().ok();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// An interactive terminal session. Restored on drop.
///
/// ```no_run
/// use grid_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // draw, read input ...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    #[cfg(unix)]
    saved: Option<libc::termios>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// A handle for the controlling terminal. Nothing is changed until
    /// [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            saved: None,
            size: get_size().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-read the window size and cache it.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Switch to raw mode and the alternate screen, and turn on mouse
    /// clicks, bracketed paste, and focus reports. A second call is a no-op.
    ///
    /// # Errors
    ///
    /// Fails if termios cannot be changed or stdout cannot be written.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        watch_resize();
        self.raw_mode_on()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_mouse(&mut out)?;
        ansi::enable_bracketed_paste(&mut out)?;
        ansi::enable_focus_reporting(&mut out)?;
        out.flush()?;

        self.active = true;
        tracing::debug!(cols = self.size.cols, rows = self.size.rows, "terminal entered");
        Ok(())
    }

    /// Undo [`enter`](Self::enter). A call while inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Fails if stdout cannot be written or termios cannot be restored.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        ansi::end_sync(&mut out)?;
        ansi::disable_focus_reporting(&mut out)?;
        ansi::disable_bracketed_paste(&mut out)?;
        ansi::disable_mouse(&mut out)?;
        ansi::reset(&mut out)?;
        ansi::set_cursor_shape(&mut out, ansi::CursorShape::Default)?;
        ansi::cursor_show(&mut out)?;
        ansi::exit_alt_screen(&mut out)?;
        out.flush()?;
        drop(out);

        self.raw_mode_off()?;
        self.active = false;
        tracing::debug!("terminal restored");
        Ok(())
    }

    #[cfg(unix)]
    fn raw_mode_on(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }
        // SAFETY: termios is plain data, filled by tcgetattr before use.
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            self.saved = Some(termios);
            if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
                *backup = Some(termios);
            }

            libc::cfmakeraw(&raw mut termios);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    #[cfg(unix)]
    fn raw_mode_off(&mut self) -> io::Result<()> {
        let Some(original) = self.saved.take() else {
            return Ok(());
        };
        // SAFETY: `original` came from tcgetattr on this fd.
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
            *backup = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn raw_mode_on(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(not(unix))]
    fn raw_mode_off(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.leave() {
                tracing::warn!(error = %e, "terminal restore failed");
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_inactive_with_some_size() {
        let term = Terminal::new();
        assert!(!term.is_active());
        assert!(term.size().cols > 0 && term.size().rows > 0);
    }

    #[test]
    fn leave_without_enter_is_noop() {
        let mut term = Terminal::new();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn refresh_size_caches() {
        let mut term = Terminal::new();
        let size = term.refresh_size();
        assert_eq!(size, term.size());
    }

    #[test]
    fn take_resize_clears_flag() {
        RESIZED.store(true, Ordering::Relaxed);
        assert!(take_resize());
        assert!(!take_resize());
    }

    #[test]
    fn emergency_restore_turns_everything_off() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        for seq in ["\x1b[?1000l", "\x1b[?1006l", "\x1b[?2004l", "\x1b[?1004l", "\x1b[?25h"] {
            assert!(s.contains(seq), "missing {seq:?}");
        }
        assert!(s.ends_with("\x1b[?1049l"));
    }
}
