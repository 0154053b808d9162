// SPDX-License-Identifier: MIT
//
// In-memory terminal surface.
//
// `VirtualScreen` is a grid of cells that interprets exactly the subset of
// output the snowfall produces: cursor positioning, cursor-forward, screen
// clears, SGR color/reset units, and plain text. It exists so the simulation,
// emitter, and controller can be tested against what a viewer would see
// rather than against raw escape bytes.
//
// Writes outside the grid are dropped, the way a real terminal drops writes
// past the last column when autowrap is irrelevant to the caller.

use std::io;

use unicode_width::UnicodeWidthChar;

use crate::color::Rgb;
use crate::output::Surface;

// ─── ScreenCell ──────────────────────────────────────────────────────────────

/// One cell of a [`VirtualScreen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCell {
    pub ch: char,
    /// Foreground color active when the cell was written, `None` for default.
    pub fg: Option<Rgb>,
}

impl ScreenCell {
    pub const BLANK: Self = Self { ch: ' ', fg: None };
}

impl Default for ScreenCell {
    fn default() -> Self {
        Self::BLANK
    }
}

// ─── VirtualScreen ───────────────────────────────────────────────────────────

/// A fixed-size in-memory [`Surface`].
#[derive(Debug, Clone)]
pub struct VirtualScreen {
    width: u16,
    height: u16,
    cells: Vec<ScreenCell>,
    cursor: (u16, u16),
    fg: Option<Rgb>,
    clears: usize,
    flushes: usize,
}

impl VirtualScreen {
    /// A blank `width × height` screen with the cursor at the origin.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![ScreenCell::BLANK; usize::from(width) * usize::from(height)],
            cursor: (0, 0),
            fg: None,
            clears: 0,
            flushes: 0,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Current cursor position `(x, y)`.
    #[must_use]
    pub const fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    /// The cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<ScreenCell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// The character at `(x, y)`, blank outside the grid.
    #[must_use]
    pub fn char_at(&self, x: u16, y: u16) -> char {
        self.cell(x, y).map_or(' ', |c| c.ch)
    }

    /// Row `y` as plain text with trailing blanks trimmed.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        let text: String = (0..self.width).map(|x| self.char_at(x, y)).collect();
        text.trim_end().to_string()
    }

    /// Whether every cell is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.ch == ' ')
    }

    /// Number of full-screen clears performed.
    #[must_use]
    pub const fn clears(&self) -> usize {
        self.clears
    }

    /// Number of flushes performed.
    #[must_use]
    pub const fn flushes(&self) -> usize {
        self.flushes
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    fn put(&mut self, ch: char) {
        let (x, y) = self.cursor;
        if let Some(i) = self.index(x, y) {
            self.cells[i] = ScreenCell { ch, fg: self.fg };
        }
        let advance = u16::try_from(ch.width().unwrap_or(0).max(1)).unwrap_or(1);
        self.cursor.0 = x.saturating_add(advance);
    }

    /// Apply one SGR parameter list (the bytes between `ESC [` and `m`).
    fn apply_sgr(&mut self, params: &str) {
        let parts: Vec<u16> = params
            .split(';')
            .map(|p| p.parse().unwrap_or(0))
            .collect();
        match parts.as_slice() {
            [] | [0] => self.fg = None,
            [38, 2, r, g, b] => {
                let channel = |v: u16| u8::try_from(v).unwrap_or(u8::MAX);
                self.fg = Some(Rgb::new(channel(*r), channel(*g), channel(*b)));
            }
            [39] => self.fg = None,
            _ => {}
        }
    }

    /// Interpret a CSI sequence given its parameter bytes and final byte.
    fn apply_csi(&mut self, params: &str, final_byte: char) {
        match final_byte {
            'm' => self.apply_sgr(params),
            'C' => {
                let n = params.parse::<u16>().unwrap_or(1).max(1);
                self.cursor.0 = self.cursor.0.saturating_add(n);
            }
            'H' => {
                let mut it = params.split(';').map(|p| p.parse::<u16>().unwrap_or(1));
                let row = it.next().unwrap_or(1).max(1);
                let col = it.next().unwrap_or(1).max(1);
                self.cursor = (col - 1, row - 1);
            }
            'J' if params == "2" => self.wipe(),
            _ => {}
        }
    }

    fn wipe(&mut self) {
        self.cells.fill(ScreenCell::BLANK);
        self.clears += 1;
    }
}

impl Surface for VirtualScreen {
    fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.cursor = (x, y);
        Ok(())
    }

    fn write_cells(&mut self, text: &str) -> io::Result<()> {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\x1b' {
                if chars.peek() != Some(&'[') {
                    continue;
                }
                chars.next();
                let mut params = String::new();
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        self.apply_csi(&params, c);
                        break;
                    }
                    params.push(c);
                }
            } else if !ch.is_control() {
                self.put(ch);
            }
        }
        Ok(())
    }

    fn skip_cells(&mut self, n: u16) -> io::Result<()> {
        self.cursor.0 = self.cursor.0.saturating_add(n);
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.wipe();
        self.cursor = (0, 0);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
