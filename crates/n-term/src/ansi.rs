// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; the emitter in n-flake decides that.
// This module just knows the byte-level encoding of every terminal command
// the snowfall needs.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// The one composite helper is `paint`: a glyph wrapped in a TrueColor SGR
// and a reset. That unit is what the color template engine injects and what
// it later recognises as opaque, so its shape is fixed here in one place.

use std::io::{self, Write};

use crate::color::Rgb;

/// SGR reset, as text. Terminates every painted unit.
pub const RESET: &str = "\x1b[0m";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Move the cursor right by `n` columns (CUF). Does nothing for `n == 0`.
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}C")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Move the cursor to the top-left corner (CUP with no parameters).
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(RESET.as_bytes())
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// A single glyph painted in `color`, followed by a reset.
///
/// ```
/// use n_term::ansi::paint;
/// use n_term::color::Rgb;
///
/// assert_eq!(paint('*', Rgb::new(1, 2, 3)), "\x1b[38;2;1;2;3m*\x1b[0m");
/// ```
#[must_use]
pub fn paint(glyph: char, color: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m{glyph}{RESET}", color.r, color.g, color.b)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
