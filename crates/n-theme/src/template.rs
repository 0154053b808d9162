//! Escape-aware color templating.
//!
//! A template is plain text in which single characters act as tokens. Each
//! token is replaced by a painted unit, `ESC[38;2;R;G;Bm<glyph>ESC[0m`, drawn
//! from a [`TreeColorMap`].
//!
//! Text is first split into segments: a painted unit is one opaque segment,
//! everything between units is plain. Substitution only touches plain
//! segments, so running it over text that already holds painted units leaves
//! those units alone, even when a token character (`m`, `2`, `;`) appears
//! inside their escape bytes.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use n_term::ansi;
use n_term::color::Rgb;
use regex::Regex;

use crate::palette::TREE_TOKENS;
use crate::rng::RandomSource;

/// One painted unit: a 24-bit SGR, exactly one glyph, a reset.
fn injected_unit() -> &'static Regex {
    static INJECTED_UNIT: OnceLock<Regex> = OnceLock::new();
    INJECTED_UNIT.get_or_init(|| {
        Regex::new(r"\x1b\[[0-9;]*m[^\x1b]\x1b\[0m").expect("Invalid injected unit regex")
    })
}

// ---------------------------------------------------------------------------
// TreeColorMap
// ---------------------------------------------------------------------------

/// What a token turns into: a glyph and the color it is painted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub glyph: char,
    pub color: Rgb,
}

impl Swatch {
    #[must_use]
    pub const fn new(glyph: char, color: Rgb) -> Self {
        Self { glyph, color }
    }

    /// The painted unit for this swatch.
    #[must_use]
    pub fn painted(self) -> String {
        ansi::paint(self.glyph, self.color)
    }
}

/// Token character → swatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeColorMap {
    swatches: BTreeMap<char, Swatch>,
}

impl TreeColorMap {
    /// An empty map. Tokens with no swatch are left as-is.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one swatch per tree token from its palette.
    pub fn generate(rng: &mut impl RandomSource) -> Self {
        let mut map = Self::new();
        for palette in TREE_TOKENS {
            let glyph = *rng.pick(palette.glyphs);
            let color = *rng.pick(palette.colors);
            map.insert(palette.token, Swatch::new(glyph, color));
        }
        map
    }

    /// Set the swatch for `token`, replacing any previous one.
    pub fn insert(&mut self, token: char, swatch: Swatch) {
        self.swatches.insert(token, swatch);
    }

    #[must_use]
    pub fn get(&self, token: char) -> Option<Swatch> {
        self.swatches.get(&token).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Segmentation & substitution
// ---------------------------------------------------------------------------

/// A slice of template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text eligible for substitution.
    Plain(&'a str),
    /// A painted unit, never split or rewritten.
    Injected(&'a str),
}

/// Split `text` into plain runs and painted units, in order. Empty plain
/// runs are omitted.
#[must_use]
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in injected_unit().find_iter(text) {
        if m.start() > last {
            out.push(Segment::Plain(&text[last..m.start()]));
        }
        out.push(Segment::Injected(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        out.push(Segment::Plain(&text[last..]));
    }
    out
}

/// Replace every token in the plain segments of `template` with its painted
/// swatch. Painted units already present are copied through unchanged.
///
/// Recoloring should always start from the canonical, uncolored template:
/// the output of one pass has no tokens left to recolor.
#[must_use]
pub fn substitute(template: &str, map: &TreeColorMap) -> String {
    let mut out = String::with_capacity(template.len() * 4);
    for segment in segments(template) {
        match segment {
            Segment::Injected(unit) => out.push_str(unit),
            Segment::Plain(text) => {
                for ch in text.chars() {
                    match map.get(ch) {
                        Some(swatch) => out.push_str(&swatch.painted()),
                        None => out.push(ch),
                    }
                }
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
