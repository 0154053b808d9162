// SPDX-License-Identifier: MIT
//
// Output buffering and the `Surface` seam.
//
// Two components work together to keep terminal I/O cheap and testable:
//
//   OutputBuffer: accumulates all ANSI bytes of one write burst in memory so
//   the burst reaches the terminal in a single write() syscall. A tick that
//   moves two hundred flakes costs one syscall, not six hundred.
//
//   Surface: the four operations the snowfall performs on a terminal:
//   position the cursor, write cells, clear everything, flush. The real
//   implementation is `StdoutSurface`; tests use `screen::VirtualScreen`.

use std::io::{self, Write};

use crate::ansi;

// ─── Surface ─────────────────────────────────────────────────────────────────

/// A character-grid output device.
///
/// Coordinates are 0-indexed device cells. `write_cells` may contain
/// embedded SGR color/reset units; every visible character occupies one
/// cell and advances the cursor by one column.
pub trait Surface {
    /// Position the cursor at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device write fails.
    fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()>;

    /// Write text at the current cursor position.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device write fails.
    fn write_cells(&mut self, text: &str) -> io::Result<()>;

    /// Move right by `n` columns without touching the cells in between.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device write fails.
    fn skip_cells(&mut self, n: u16) -> io::Result<()>;

    /// Clear the whole surface and home the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device write fails.
    fn clear_screen(&mut self) -> io::Result<()>;

    /// Push everything written so far to the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device write fails.
    fn flush(&mut self) -> io::Result<()>;
}

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates ANSI output for a single `write()` syscall.
///
/// Default capacity: 16 KB, so a full tick of a busy snowfall fits without
/// reallocation.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing via flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── BufferedSurface ─────────────────────────────────────────────────────────

/// A [`Surface`] that buffers ANSI output and flushes it to any writer.
///
/// [`StdoutSurface`] is the stdout-backed alias the binary uses. Tests point
/// it at a `Vec<u8>` to inspect the exact bytes.
pub struct BufferedSurface<W: Write> {
    out: OutputBuffer,
    sink: W,
}

/// The terminal surface: buffered output to stdout.
pub type StdoutSurface = BufferedSurface<io::Stdout>;

impl StdoutSurface {
    /// Buffered surface over the process's stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> BufferedSurface<W> {
    /// Wrap `sink` with an empty output buffer.
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self {
            out: OutputBuffer::new(),
            sink,
        }
    }

    /// Bytes written but not yet flushed.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        self.out.as_bytes()
    }

    /// The underlying writer.
    #[must_use]
    pub const fn sink(&self) -> &W {
        &self.sink
    }
}

impl<W: Write> Surface for BufferedSurface<W> {
    fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        ansi::cursor_to(&mut self.out, x, y)
    }

    fn write_cells(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn skip_cells(&mut self, n: u16) -> io::Result<()> {
        ansi::cursor_forward(&mut self.out, n)
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        ansi::clear_screen(&mut self.out)?;
        ansi::cursor_home(&mut self.out)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush_to(&mut self.sink)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
