//! # n-theme — Palettes and escape-aware coloring for n-snow
//!
//! Everything that decides what a cell looks like, and nothing that decides
//! where it goes.
//!
//! # Architecture
//!
//! ```text
//! RandomSource (seedable)
//!     │
//!     ▼
//! palette.rs:  fixed glyph and color choices (snow, tree tokens)
//!     │
//!     ▼
//! template.rs: TreeColorMap + token substitution that never splits
//!              an already-painted unit
//!     │
//!     ▼
//! tree.rs:     canonical art, current colors, cached painted lines
//! ```
//!
//! Painted units are produced by [`n_term::ansi::paint`]; this crate only
//! decides which glyph and color go into them.

pub mod palette;
pub mod rng;
pub mod template;
pub mod tree;

pub use rng::{RandomSource, Xorshift32};
pub use template::{Swatch, TreeColorMap};
pub use tree::Tree;
