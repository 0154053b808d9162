//! Render diff emitter.
//!
//! The snowfall never redraws the whole screen. Each change is a single cell
//! write (clear-then-draw), and after every batch the hardware cursor goes
//! back to where the user's cursor is. The emitter is the only thing that
//! talks to the [`Surface`]; it knows cells, not flakes or sets.

use std::io;

use n_term::ansi;
use n_term::color::Rgb;
use n_term::output::Surface;
use n_theme::template::{self, Segment};

use crate::controller::Cursor;

/// Cell-level writer over a [`Surface`].
pub struct Emitter<S: Surface> {
    surface: S,
}

impl<S: Surface> Emitter<S> {
    #[must_use]
    pub const fn new(surface: S) -> Self {
        Self { surface }
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.surface
    }

    /// Write `glyph` painted in `color` at device cell `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface write fails.
    pub fn draw_cell(&mut self, x: u16, y: u16, glyph: char, color: Rgb) -> io::Result<()> {
        self.surface.move_cursor(x, y)?;
        self.surface.write_cells(&ansi::paint(glyph, color))
    }

    /// Write a single blank at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface write fails.
    pub fn clear_cell(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.surface.move_cursor(x, y)?;
        self.surface.write_cells(" ")
    }

    /// Overwrite a `width`-cell field at `(x, y)` with `text`.
    ///
    /// The field is blanked first: a cell write never erases what a longer
    /// previous text left behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface write fails.
    pub fn write_status_field(&mut self, x: u16, y: u16, text: &str, width: usize) -> io::Result<()> {
        self.surface.move_cursor(x, y)?;
        self.surface.write_cells(&" ".repeat(width))?;
        self.surface.move_cursor(x, y)?;
        self.surface.write_cells(text)
    }

    /// Draw one line of painted art starting at `(x, y)`.
    ///
    /// Spaces are transparent: the cells under them are skipped, not
    /// blanked. Cells at or beyond column `max_x` are not written.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface write fails.
    pub fn draw_art_line(&mut self, x: u16, y: u16, line: &str, max_x: u16) -> io::Result<()> {
        self.surface.move_cursor(x, y)?;
        let mut col = x;
        let mut skip: u16 = 0;

        for segment in template::segments(line) {
            let cells: Vec<Cell<'_>> = match segment {
                Segment::Injected(unit) => vec![Cell::Unit(unit)],
                Segment::Plain(text) => text.chars().map(Cell::Char).collect(),
            };
            for cell in cells {
                if col >= max_x {
                    return Ok(());
                }
                match cell {
                    Cell::Char(' ') => skip += 1,
                    Cell::Char(ch) => {
                        self.surface.skip_cells(skip)?;
                        skip = 0;
                        let mut buf = [0u8; 4];
                        self.surface.write_cells(ch.encode_utf8(&mut buf))?;
                    }
                    Cell::Unit(unit) => {
                        self.surface.skip_cells(skip)?;
                        skip = 0;
                        self.surface.write_cells(unit)?;
                    }
                }
                col = col.saturating_add(1);
            }
        }
        Ok(())
    }

    /// Put the hardware cursor back on the user's cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface write fails.
    pub fn restore_cursor(&mut self, cursor: Cursor) -> io::Result<()> {
        self.surface.move_cursor(cursor.x, cursor.y)
    }

    /// Blank the whole surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface write fails.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        self.surface.clear_screen()
    }

    /// Push the batch to the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface write fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.surface.flush()
    }
}

/// One visible cell of a painted line.
enum Cell<'a> {
    Char(char),
    Unit(&'a str),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
