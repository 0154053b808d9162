//! Input/mode controller.
//!
//! Maps key events to commands and applies them to the session [`State`].
//!
//! | Key            | Command                                  |
//! |----------------|------------------------------------------|
//! | arrows         | move the cursor, wrapping at the edges   |
//! | `s`            | place a flake at the cursor              |
//! | `a`            | toggle auto-snow                         |
//! | `c`            | clear every flake                        |
//! | `m`            | toggle pile / burn                       |
//! | `r`            | recolor the tree                         |
//! | Escape         | exit                                     |
//! | Ctrl-C         | exit (when it arrives as a byte)         |
//!
//! Anything else is ignored and leaves the hardware cursor alone.

use std::io;

use log::{debug, info};
use n_term::input::{KeyCode, KeyEvent};
use n_term::output::Surface;
use n_theme::RandomSource;

use crate::flake::Flake;
use crate::grid::{self, GridSize, Position};
use crate::render::Emitter;
use crate::session::{self, State};

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// The user's cursor, in device cells. Independent of the simulation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: u16,
    pub y: u16,
}

impl Cursor {
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// The grid cell under the cursor.
    #[must_use]
    pub const fn position(self) -> Position {
        Position::new(self.y, self.x)
    }

    #[must_use]
    pub const fn up(self, size: GridSize) -> Self {
        Self::new(self.x, wrap_dec(self.y, size.height))
    }

    #[must_use]
    pub const fn down(self, size: GridSize) -> Self {
        Self::new(self.x, wrap_inc(self.y, size.height))
    }

    #[must_use]
    pub const fn left(self, size: GridSize) -> Self {
        Self::new(wrap_dec(self.x, size.width), self.y)
    }

    #[must_use]
    pub const fn right(self, size: GridSize) -> Self {
        Self::new(wrap_inc(self.x, size.width), self.y)
    }
}

#[allow(clippy::cast_possible_truncation)] // Result is < n, and n is a u16.
const fn wrap_inc(v: u16, n: u16) -> u16 {
    ((v as u32 + 1) % n as u32) as u16
}

#[allow(clippy::cast_possible_truncation)]
const fn wrap_dec(v: u16, n: u16) -> u16 {
    ((v as u32 + n as u32 - 1) % n as u32) as u16
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A recognised key, as an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Place,
    ToggleAuto,
    Clear,
    ToggleMode,
    Recolor,
    Exit,
}

impl Command {
    /// The command bound to `key`, if any.
    #[must_use]
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.is_interrupt() {
            return Some(Self::Exit);
        }
        if !key.modifiers.is_empty() {
            return None;
        }
        Some(match key.code {
            KeyCode::Up => Self::Up,
            KeyCode::Down => Self::Down,
            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            KeyCode::Escape => Self::Exit,
            KeyCode::Char('s') => Self::Place,
            KeyCode::Char('a') => Self::ToggleAuto,
            KeyCode::Char('c') => Self::Clear,
            KeyCode::Char('m') => Self::ToggleMode,
            KeyCode::Char('r') => Self::Recolor,
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Terminal. The caller tears the terminal down and exits with status 0.
    Exiting,
}

/// Apply one polled key (or none) to `state`.
///
/// # Errors
///
/// Returns an error if writing to the surface fails.
pub fn dispatch<S: Surface>(
    state: &mut State,
    key: Option<KeyEvent>,
    emitter: &mut Emitter<S>,
    rng: &mut impl RandomSource,
) -> io::Result<Phase> {
    let Some(command) = key.and_then(Command::from_key) else {
        return Ok(Phase::Running);
    };
    debug!("dispatch {command:?}");

    let size = state.size;
    match command {
        Command::Exit => return Ok(Phase::Exiting),
        Command::Up => state.cursor = state.cursor.up(size),
        Command::Down => state.cursor = state.cursor.down(size),
        Command::Left => state.cursor = state.cursor.left(size),
        Command::Right => state.cursor = state.cursor.right(size),
        Command::Place => {
            let pos = state.cursor.position();
            let flake = Flake::random(rng);
            if grid::place(&mut state.moving, &mut state.statics, size, pos, flake) {
                emitter.draw_cell(pos.col, pos.row, flake.glyph, flake.color)?;
                session::write_status(emitter, size, &format!("{pos} {flake}"))?;
            }
        }
        Command::ToggleAuto => {
            state.auto_spawn = !state.auto_spawn;
            info!("auto-snow {}", if state.auto_spawn { "on" } else { "off" });
            session::render_legend(state, emitter)?;
        }
        Command::Clear => {
            grid::clear_set(&mut state.moving, emitter)?;
            grid::clear_set(&mut state.statics, emitter)?;
        }
        Command::ToggleMode => {
            state.mode = state.mode.toggled();
            info!("mode {}", state.mode);
            session::render_legend(state, emitter)?;
        }
        Command::Recolor => state.tree.recolor(rng),
    }

    emitter.restore_cursor(state.cursor)?;
    Ok(Phase::Running)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
