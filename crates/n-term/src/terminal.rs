// SPDX-License-Identifier: MIT
//
// Terminal control: cbreak mode, teardown, and interrupt handling.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control. Each unsafe block is
// minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's mode. `Terminal::enter` switches stdin to
// cbreak mode (no line buffering, no echo, but ISIG stays on so Ctrl-C still
// raises SIGINT), clears the screen and homes the cursor. Everything that
// leaves the session goes through one function, `teardown()`:
//
//   - the Escape key path (the binary calls it before exiting),
//   - `Terminal::leave` and `Drop`,
//   - the panic hook,
//   - the signal watcher thread installed by `install_interrupt_handler`.
//
// `teardown()` touches no loop state. It writes a pre-built restore sequence
// straight to fd 1 (bypassing Rust's stdout lock, which the main thread may
// hold mid-flush) and restores termios from a global backup. An atomic flag
// makes it run at most once per session, so a panic message printed after
// the hook's teardown is not wiped by the unwinding `Drop`.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
#[cfg(unix)]
use std::sync::Mutex;

use log::{info, warn};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn query_dimensions() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn query_dimensions() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Teardown ───────────────────────────────────────────────────────────────

/// Original termios, saved by [`Terminal::enter`] for [`teardown`].
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Set once a session's teardown has run; cleared by [`Terminal::enter`].
static TORN_DOWN: AtomicBool = AtomicBool::new(false);

/// Restore sequence: reset formatting, clear screen, home cursor, show cursor.
pub const RESTORE: &[u8] = b"\x1b[0m\x1b[2J\x1b[H\x1b[?25h";

/// Restore the terminal to a usable state.
///
/// Safe to call from any thread at any time, any number of times: only the
/// first call after [`Terminal::enter`] does anything. Errors are ignored;
/// there is nobody left to report them to.
pub fn teardown() {
    if TORN_DOWN.swap(true, Ordering::SeqCst) {
        return;
    }

    write_restore();

    #[cfg(unix)]
    restore_termios_from_backup();
}

/// Write [`RESTORE`] directly to stdout's file descriptor.
fn write_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            RESTORE.as_ptr().cast::<libc::c_void>(),
            RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(RESTORE);
        let _ = io::stdout().flush();
    }
}

#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
        if let Some(original) = guard.take() {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const original);
            }
        }
    }
}

/// Panic hook guard: installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that tears the terminal down before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            teardown();
            original(info);
        }));
    });
}

// ─── Interrupts ─────────────────────────────────────────────────────────────

/// Route SIGINT, SIGTERM and SIGHUP to [`teardown`] followed by exit status 0.
///
/// The signals are delivered to a dedicated watcher thread rather than an
/// async-signal handler, so `teardown` runs in ordinary thread context
/// regardless of what the main loop is doing.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be registered or the
/// watcher thread cannot be spawned.
#[cfg(unix)]
pub fn install_interrupt_handler() -> io::Result<()> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
    std::thread::Builder::new()
        .name("signal-watcher".into())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                warn!("received signal {signal}, exiting");
                teardown();
                std::process::exit(0);
            }
        })?;
    Ok(())
}

#[cfg(not(unix))]
pub fn install_interrupt_handler() -> io::Result<()> {
    Ok(())
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal session handle.
///
/// [`enter`](Self::enter) and [`leave`](Self::leave) are paired and
/// idempotent. The terminal is torn down when the handle is dropped, even on
/// panic.
///
/// ```no_run
/// use n_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... animate ...
/// term.leave();
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    active: bool,
}

impl Terminal {
    /// Create an inactive handle. Does not touch the terminal.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: false }
    }

    /// Whether a session is in progress.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start a session: cbreak mode, cleared screen, cursor at home.
    ///
    /// # Errors
    ///
    /// Returns an error if the termios change or the terminal write fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        enable_cbreak_mode()?;
        TORN_DOWN.store(false, Ordering::SeqCst);

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::clear_screen(&mut lock)?;
        ansi::cursor_home(&mut lock)?;
        lock.flush()?;

        self.active = true;
        info!("terminal session started");
        Ok(())
    }

    /// End the session via [`teardown`].
    pub fn leave(&mut self) {
        if !self.active {
            return;
        }
        // Anything still buffered in std's stdout must land before the
        // restore sequence, which bypasses it.
        let _ = io::stdout().flush();
        teardown();
        self.active = false;
        info!("terminal session ended");
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.leave();
    }
}

// ── Cbreak Mode (termios) ─────────────────────────────────────────────

#[cfg(unix)]
fn enable_cbreak_mode() -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    if !is_tty() {
        return Ok(());
    }

    let fd = io::stdin().as_raw_fd();

    unsafe {
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &raw mut termios) != 0 {
            return Err(io::Error::last_os_error());
        }

        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(termios);
        }

        // No line buffering, no echo. ISIG stays set: Ctrl-C is a signal.
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}

#[cfg(not(unix))]
fn enable_cbreak_mode() -> io::Result<()> {
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn size_equality() {
        assert_eq!(Size { cols: 80, rows: 24 }, Size { cols: 80, rows: 24 });
        assert_ne!(Size { cols: 80, rows: 24 }, Size { cols: 120, rows: 40 });
    }

    #[test]
    fn query_dimensions_does_not_panic() {
        if let Some(size) = query_dimensions() {
            assert!(size.cols > 0 && size.rows > 0);
        }
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    // ── Restore sequence ────────────────────────────────────────────

    #[test]
    fn restore_matches_ansi_helpers() {
        let mut expected = Vec::new();
        ansi::reset(&mut expected).unwrap();
        ansi::clear_screen(&mut expected).unwrap();
        ansi::cursor_home(&mut expected).unwrap();
        ansi::cursor_show(&mut expected).unwrap();
        assert_eq!(RESTORE, expected.as_slice());
    }

    #[test]
    fn restore_shows_cursor_last() {
        let s = std::str::from_utf8(RESTORE).unwrap();
        assert!(s.ends_with("\x1b[?25h"));
    }

    // ── Session ─────────────────────────────────────────────────────

    // One test drives the whole lifecycle: TORN_DOWN is process-global and
    // the test harness runs tests in parallel.
    #[test]
    fn session_lifecycle() {
        let mut term = Terminal::new();
        assert!(!term.is_active());

        term.leave();
        assert!(!term.is_active());

        for _ in 0..2 {
            term.enter().unwrap();
            term.enter().unwrap();
            assert!(term.is_active());
            assert!(!TORN_DOWN.load(Ordering::SeqCst));

            term.leave();
            assert!(!term.is_active());
            assert!(TORN_DOWN.load(Ordering::SeqCst));

            teardown();
            assert!(TORN_DOWN.load(Ordering::SeqCst));
        }

        term.enter().unwrap();
        drop(term);
        assert!(TORN_DOWN.load(Ordering::SeqCst));
    }
}
