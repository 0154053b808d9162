//! The decorated tree.
//!
//! [`TREE_ART`] is the canonical, uncolored art. It is never modified:
//! every recolor substitutes into a fresh copy, and the result is cached
//! until the next [`Tree::recolor`].

use crate::rng::RandomSource;
use crate::template::{self, TreeColorMap};

/// Canonical tree art, one line per row. `S` star, `G` needles,
/// `O` ornament, `L` light, `T` trunk; spaces are transparent.
pub const TREE_ART: [&str; 10] = [
    "        S",
    "       GGG",
    "      GOGLG",
    "     GGGGGGG",
    "    GLGOGGLGG",
    "   GGGGGGGGGGG",
    "  GOGGLGGGOGGLG",
    " GGGGGGGGGGGGGGG",
    "       TTT",
    "       TTT",
];

/// The tree art plus its current coloring.
#[derive(Debug, Clone)]
pub struct Tree {
    colors: TreeColorMap,
    /// Painted lines for `colors`; `None` after a recolor.
    cache: Option<Vec<String>>,
}

impl Tree {
    /// A tree with freshly drawn colors.
    pub fn new(rng: &mut impl RandomSource) -> Self {
        Self::with_colors(TreeColorMap::generate(rng))
    }

    #[must_use]
    pub const fn with_colors(colors: TreeColorMap) -> Self {
        Self {
            colors,
            cache: None,
        }
    }

    /// Draw new swatches. The next [`lines`](Self::lines) call substitutes
    /// them into the canonical art.
    pub fn recolor(&mut self, rng: &mut impl RandomSource) {
        self.colors = TreeColorMap::generate(rng);
        self.cache = None;
    }

    #[must_use]
    pub const fn colors(&self) -> &TreeColorMap {
        &self.colors
    }

    /// The painted art, one string per line.
    pub fn lines(&mut self) -> &[String] {
        let colors = &self.colors;
        self.cache.get_or_insert_with(|| {
            TREE_ART
                .iter()
                .map(|line| template::substitute(line, colors))
                .collect()
        })
    }

    /// Width of the widest art line, in cells.
    #[must_use]
    pub fn width() -> u16 {
        let widest = TREE_ART.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        u16::try_from(widest).unwrap_or(u16::MAX)
    }

    /// Number of art lines.
    #[must_use]
    pub fn height() -> u16 {
        u16::try_from(TREE_ART.len()).unwrap_or(u16::MAX)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
