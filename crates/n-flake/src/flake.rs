//! The flake value type.
//!
//! A flake is a glyph and a color. Two flakes are equal when their glyphs
//! match; color is decoration. The sentinel glyph marks a static cell that
//! counts as occupied but lets falling flakes through.

use std::fmt;

use n_term::ansi;
use n_term::color::Rgb;
use n_theme::RandomSource;
use n_theme::palette::{FLAKE_GLYPHS, SENTINEL, SNOW_COLORS};

// ---------------------------------------------------------------------------
// Flake
// ---------------------------------------------------------------------------

/// A single snow particle.
#[derive(Debug, Clone, Copy)]
pub struct Flake {
    pub glyph: char,
    pub color: Rgb,
}

impl Flake {
    #[inline]
    #[must_use]
    pub const fn new(glyph: char, color: Rgb) -> Self {
        Self { glyph, color }
    }

    /// A sentinel placeholder.
    #[must_use]
    pub const fn sentinel() -> Self {
        Self::new(SENTINEL, Rgb::WHITE)
    }

    /// A flake with a glyph and color drawn from the snow palettes.
    pub fn random(rng: &mut impl RandomSource) -> Self {
        let glyph = *rng.pick(&FLAKE_GLYPHS);
        let color = *rng.pick(&SNOW_COLORS);
        Self::new(glyph, color)
    }

    /// Whether this is the passable placeholder glyph.
    #[inline]
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        self.glyph == SENTINEL
    }

    /// The flake as a painted unit.
    #[must_use]
    pub fn painted(&self) -> String {
        ansi::paint(self.glyph, self.color)
    }
}

// Glyph-only equality: color never decides whether a cell is passable.
impl PartialEq for Flake {
    fn eq(&self, other: &Self) -> bool {
        self.glyph == other.glyph
    }
}

impl Eq for Flake {}

impl fmt::Display for Flake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.painted())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
