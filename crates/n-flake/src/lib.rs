//! # n-flake — Snowfall core for n-snow
//!
//! This crate contains the simulation and everything that reacts to it:
//!
//! - **[`flake`]** — `Flake` (glyph + color) with glyph-only equality and
//!   the sentinel predicate
//! - **[`render`]** — `Emitter`: single-cell draw/clear, fixed-width status
//!   fields, transparent art lines, cursor restore over any `Surface`
//! - **[`grid`]** — `Position`, `GridSize`, `Mode`, the moving and static
//!   sets, and `advance` / `spawn` / `place` / `clear_set`
//! - **[`controller`]** — `Cursor`, `Command`, `Phase`, key dispatch
//! - **[`session`]** — `State`, screen layout, legend, tree rendering, `tick`
//!
//! Nothing here writes to stdout directly or keeps global state. The binary
//! builds a `State`, an `Emitter<StdoutSurface>` and a random source, then
//! calls [`session::tick`] once per polled key.

pub mod controller;
pub mod flake;
pub mod grid;
pub mod render;
pub mod session;

pub use controller::{Cursor, Phase};
pub use flake::Flake;
pub use grid::{GridSize, Mode, Position};
pub use render::Emitter;
pub use session::State;
