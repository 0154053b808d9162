// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader and the bounded-wait key poller.
//
// A dedicated thread reads stdin and sends byte chunks through a standard
// channel. The main thread never blocks on `read()`: it waits on the channel
// with `recv_timeout`, and that timeout is the snowfall's frame clock. One
// tick = at most one poll wait.
//
// `KeyPoller` sits on top: it owns the reader, the byte parser, and a queue
// of decoded keys, and hands out one key per call. Keys typed faster than
// the tick rate are queued, not dropped.
//
// Shutdown: the reader thread uses `poll()` with a short timeout on stdin's
// file descriptor, checking an `AtomicBool` stop flag between polls. This
// lets us shut down cleanly without leaving the thread stuck in `read()`.

use std::collections::VecDeque;
#[cfg(unix)]
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::input::{KeyEvent, Parser};

/// Byte chunk read from stdin. A keypress is 1-6 bytes; 1 KB is plenty.
const READ_BUF_SIZE: usize = 1024;

/// How often the reader thread checks the stop flag (milliseconds).
const POLL_TIMEOUT_MS: i32 = 50;

// ─── StdinReader ─────────────────────────────────────────────────────────────

/// Background stdin reader thread.
///
/// Spawns a thread that reads raw bytes from stdin and sends them through a
/// channel. The thread runs until [`stop`](Self::stop) is called (or the
/// `StdinReader` is dropped).
pub struct StdinReader {
    /// The reader thread handle. `None` after `stop()` joins it.
    handle: Option<JoinHandle<()>>,
    /// Shared flag to signal the thread to exit.
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the background reader thread.
    ///
    /// Returns the reader handle and a channel receiver for byte chunks.
    /// The channel closes when the reader is stopped or stdin hits EOF.
    ///
    /// # Panics
    ///
    /// Panics if the OS cannot spawn a new thread (extremely rare).
    #[must_use]
    pub fn spawn() -> (Self, Receiver<Vec<u8>>) {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                Self::reader_loop(tx, stop_flag);
            })
            .expect("failed to spawn stdin reader thread");

        (
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        )
    }

    /// Signal the reader thread to stop and wait for it to exit. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    #[cfg(unix)]
    #[allow(clippy::needless_pass_by_value)] // Owned values moved into thread closure.
    fn reader_loop(tx: mpsc::Sender<Vec<u8>>, stop: Arc<AtomicBool>) {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            let ready = unsafe {
                let mut pfd = libc::pollfd {
                    fd: stdin_fd,
                    events: libc::POLLIN,
                    revents: 0,
                };
                libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
            };

            // Timeout or error: loop back to check stop flag.
            if ready <= 0 {
                continue;
            }

            let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };
            if n <= 0 {
                break;
            }

            #[allow(clippy::cast_sign_loss)] // n > 0 guaranteed above.
            let chunk = buf[..n as usize].to_vec();

            if tx.send(chunk).is_err() {
                break;
            }
        }
    }

    /// Non-unix fallback using blocking reads with no poll.
    #[cfg(not(unix))]
    #[allow(clippy::needless_pass_by_value)]
    fn reader_loop(tx: mpsc::Sender<Vec<u8>>, stop: Arc<AtomicBool>) {
        use std::io::Read;

        let stdin = std::io::stdin();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            match stdin.lock().read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── KeyPoller ───────────────────────────────────────────────────────────────

/// Bounded-wait keyboard source: one decoded key per call, or `None`.
pub struct KeyPoller {
    reader: Option<StdinReader>,
    rx: Receiver<Vec<u8>>,
    parser: Parser,
    queue: VecDeque<KeyEvent>,
}

impl KeyPoller {
    /// Start reading stdin in the background.
    #[must_use]
    pub fn spawn() -> Self {
        let (reader, rx) = StdinReader::spawn();
        Self::from_parts(Some(reader), rx)
    }

    /// A poller fed from an arbitrary byte channel (tests, replays).
    #[must_use]
    pub fn from_channel(rx: Receiver<Vec<u8>>) -> Self {
        Self::from_parts(None, rx)
    }

    fn from_parts(reader: Option<StdinReader>, rx: Receiver<Vec<u8>>) -> Self {
        Self {
            reader,
            rx,
            parser: Parser::new(),
            queue: VecDeque::new(),
        }
    }

    /// Return the next key, waiting at most `timeout` for input.
    ///
    /// An already-decoded key is returned immediately. A lone ESC still
    /// pending when the wait expires is reported as Escape. A closed channel
    /// behaves like a timeout that never produces input.
    pub fn poll_key(&mut self, timeout: Duration) -> Option<KeyEvent> {
        if let Some(key) = self.queue.pop_front() {
            return Some(key);
        }

        match self.rx.recv_timeout(timeout) {
            Ok(bytes) => {
                let keys = self.parser.advance(&bytes);
                self.queue.extend(keys);
            }
            Err(RecvTimeoutError::Timeout) => {
                if self.parser.has_pending() {
                    let keys = self.parser.flush();
                    self.queue.extend(keys);
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                if self.parser.has_pending() {
                    let keys = self.parser.flush();
                    self.queue.extend(keys);
                } else {
                    // Keep the pacing contract even with no input source.
                    thread::sleep(timeout);
                }
            }
        }

        self.queue.pop_front()
    }

    /// Stop the background reader, if any. Idempotent.
    pub fn stop(&mut self) {
        if let Some(reader) = self.reader.as_mut() {
            reader.stop();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use std::time::Instant;

    #[test]
    fn read_buf_size_reasonable() {
        assert!(READ_BUF_SIZE >= 64);
    }

    #[test]
    fn spawn_and_stop() {
        let (mut reader, _rx) = StdinReader::spawn();
        reader.stop();
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut reader, _rx) = StdinReader::spawn();
        reader.stop();
        reader.stop();
    }

    #[test]
    fn channel_closes_on_stop() {
        let (mut reader, rx) = StdinReader::spawn();
        reader.stop();
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    // ── KeyPoller ───────────────────────────────────────────────────────

    #[test]
    fn poll_times_out_with_no_input() {
        let (_tx, rx) = mpsc::channel();
        let mut poller = KeyPoller::from_channel(rx);
        assert_eq!(poller.poll_key(Duration::from_millis(5)), None);
    }

    #[test]
    fn poll_returns_one_key_per_call() {
        let (tx, rx) = mpsc::channel();
        let mut poller = KeyPoller::from_channel(rx);
        tx.send(b"sa".to_vec()).unwrap();

        let timeout = Duration::from_millis(5);
        assert_eq!(poller.poll_key(timeout).map(|k| k.code), Some(KeyCode::Char('s')));
        assert_eq!(poller.poll_key(timeout).map(|k| k.code), Some(KeyCode::Char('a')));
        assert_eq!(poller.poll_key(timeout), None);
    }

    #[test]
    fn queued_key_returns_without_waiting() {
        let (tx, rx) = mpsc::channel();
        let mut poller = KeyPoller::from_channel(rx);
        tx.send(b"\x1b[A\x1b[B".to_vec()).unwrap();
        assert_eq!(
            poller.poll_key(Duration::from_millis(5)).map(|k| k.code),
            Some(KeyCode::Up)
        );

        let start = Instant::now();
        let next = poller.poll_key(Duration::from_secs(5));
        assert_eq!(next.map(|k| k.code), Some(KeyCode::Down));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn lone_escape_resolves_on_next_timeout() {
        let (tx, rx) = mpsc::channel();
        let mut poller = KeyPoller::from_channel(rx);
        tx.send(vec![0x1B]).unwrap();

        let timeout = Duration::from_millis(5);
        assert_eq!(poller.poll_key(timeout), None);
        assert_eq!(poller.poll_key(timeout).map(|k| k.code), Some(KeyCode::Escape));
    }

    #[test]
    fn disconnected_channel_flushes_pending_escape() {
        let (tx, rx) = mpsc::channel();
        let mut poller = KeyPoller::from_channel(rx);
        tx.send(vec![0x1B]).unwrap();
        drop(tx);

        let timeout = Duration::from_millis(5);
        assert_eq!(poller.poll_key(timeout), None);
        assert_eq!(poller.poll_key(timeout).map(|k| k.code), Some(KeyCode::Escape));
        assert_eq!(poller.poll_key(timeout), None);
    }

    #[test]
    fn stop_without_reader_is_noop() {
        let (_tx, rx) = mpsc::channel::<Vec<u8>>();
        let mut poller = KeyPoller::from_channel(rx);
        poller.stop();
    }
}
