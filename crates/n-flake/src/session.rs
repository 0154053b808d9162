//! Session state and the per-tick driver.
//!
//! Screen layout, in device rows:
//!
//! ```text
//!   0 ..height        grid (tree bottom-centred, snow on top)
//!   height+1..+3      legend: controls, mode, auto-snow
//!   height+5          status field (last placement)
//! ```
//!
//! One tick is: render the tree, advance the simulation, maybe spawn, apply
//! the polled key, flush. Waiting for the key is the caller's job; that wait
//! is the frame clock.

use std::io;

use n_term::input::KeyEvent;
use n_term::output::Surface;
use n_theme::{RandomSource, Tree};

use crate::controller::{self, Cursor, Phase};
use crate::flake::Flake;
use crate::grid::{self, GridSize, Mode, MovingSet, StaticSet};
use crate::render::Emitter;

/// Width of the status field, in cells.
pub const STATUS_WIDTH: usize = 20;

/// Width every legend line is blanked to before it is rewritten.
const LEGEND_WIDTH: usize = 48;

const LEGEND_CONTROLS: [&str; 2] = [
    "arrows move   s snow   a auto   c clear",
    "m mode   r recolor   esc quit",
];

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything a tick reads and writes.
#[derive(Debug, Clone)]
pub struct State {
    pub moving: MovingSet,
    pub statics: StaticSet,
    pub cursor: Cursor,
    pub mode: Mode,
    pub auto_spawn: bool,
    pub tree: Tree,
    pub size: GridSize,
}

impl State {
    /// Empty sets, cursor at the origin, pile mode.
    pub fn new(size: GridSize, auto_spawn: bool, rng: &mut impl RandomSource) -> Self {
        Self {
            moving: MovingSet::new(),
            statics: StaticSet::new(),
            cursor: Cursor::default(),
            mode: Mode::default(),
            auto_spawn,
            tree: Tree::new(rng),
            size,
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// First legend row.
#[must_use]
pub const fn legend_row(size: GridSize) -> u16 {
    size.height.saturating_add(1)
}

/// Where the status field starts, `(x, y)`.
#[must_use]
pub const fn status_origin(size: GridSize) -> (u16, u16) {
    (1, size.height.saturating_add(5))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Clear the screen and draw the legend. Called once at start-up.
///
/// # Errors
///
/// Returns an error if writing to the surface fails.
pub fn start<S: Surface>(state: &State, emitter: &mut Emitter<S>) -> io::Result<()> {
    emitter.clear_screen()?;
    render_legend(state, emitter)?;
    emitter.restore_cursor(state.cursor)?;
    emitter.flush()
}

/// Rewrite the three legend lines.
///
/// # Errors
///
/// Returns an error if writing to the surface fails.
pub fn render_legend<S: Surface>(state: &State, emitter: &mut Emitter<S>) -> io::Result<()> {
    let y = legend_row(state.size);
    let auto = if state.auto_spawn { "on" } else { "off" };
    let status = format!("mode: {}   auto-snow: {auto}", state.mode);

    for (dy, line) in (0u16..).zip(LEGEND_CONTROLS.iter().copied().chain([status.as_str()])) {
        emitter.write_status_field(1, y.saturating_add(dy), line, LEGEND_WIDTH)?;
    }
    Ok(())
}

/// Overwrite the status field with `text`.
///
/// # Errors
///
/// Returns an error if writing to the surface fails.
pub fn write_status<S: Surface>(emitter: &mut Emitter<S>, size: GridSize, text: &str) -> io::Result<()> {
    let (x, y) = status_origin(size);
    emitter.write_status_field(x, y, text, STATUS_WIDTH)
}

/// Draw the tree bottom-centred in the grid, clipped to it.
///
/// # Errors
///
/// Returns an error if writing to the surface fails.
pub fn render_tree<S: Surface>(state: &mut State, emitter: &mut Emitter<S>) -> io::Result<()> {
    let size = state.size;
    let x = size.width.saturating_sub(Tree::width()) / 2;
    let hidden = usize::from(Tree::height().saturating_sub(size.height));
    let top = size.height.saturating_sub(Tree::height());

    for (y, line) in (top..).zip(state.tree.lines().iter().skip(hidden)) {
        emitter.draw_art_line(x, y, line, size.width)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tick
// ---------------------------------------------------------------------------

/// Run one tick with the key polled for it, if any.
///
/// # Errors
///
/// Returns an error if writing to the surface fails.
pub fn tick<S: Surface>(
    state: &mut State,
    key: Option<KeyEvent>,
    emitter: &mut Emitter<S>,
    rng: &mut impl RandomSource,
) -> io::Result<Phase> {
    render_tree(state, emitter)?;

    let moving = std::mem::take(&mut state.moving);
    state.moving = grid::advance(
        moving,
        &mut state.statics,
        state.size,
        state.mode,
        emitter,
        state.cursor,
    )?;

    if state.auto_spawn {
        let column = u16::try_from(rng.below(usize::from(state.size.width))).unwrap_or(0);
        let flake = Flake::random(rng);
        grid::spawn(&mut state.moving, &mut state.statics, state.size, column, flake);
    }

    let phase = controller::dispatch(state, key, emitter, rng)?;
    emitter.flush()?;
    Ok(phase)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
