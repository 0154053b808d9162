//! The grid simulation engine.
//!
//! Two position-keyed sets hold every flake on the grid:
//!
//! | Set          | Holds                         | Per tick                   |
//! |--------------|-------------------------------|----------------------------|
//! | [`MovingSet`]| airborne flakes               | rebuilt from scratch       |
//! | [`StaticSet`]| landed flakes and sentinels   | mutated in place           |
//!
//! A position is never in both sets at a tick boundary. [`advance`] walks
//! the moving set bottom-up (descending row), so a flake that lands is
//! already visible to the flake directly above it in the same tick.
//!
//! Landing rules by [`Mode`]:
//!
//! - **Pile**: a flake lands on the bottom row or on top of a non-sentinel
//!   static flake. A sentinel below is displaced as the flake falls into it.
//! - **Burn**: a flake lands only on the bottom row. Any static occupant in
//!   its path is removed as it falls through.

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use n_term::output::Surface;
use n_term::terminal::Size;

use crate::controller::Cursor;
use crate::flake::Flake;
use crate::render::Emitter;

// ---------------------------------------------------------------------------
// Position & size
// ---------------------------------------------------------------------------

/// A grid cell: (row, col), both 0-indexed.
///
/// Ordered row first, then column, so iterating a set in reverse visits the
/// lowest row first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: u16,
    pub col: u16,
}

impl Position {
    #[inline]
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// The cell directly below.
    #[inline]
    #[must_use]
    pub const fn below(self) -> Self {
        Self::new(self.row.saturating_add(1), self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rows below the grid kept for the legend and the status line.
pub const RESERVED_ROWS: u16 = 6;

/// Grid dimensions in cells. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Used when the terminal size is unknown.
    pub const DEFAULT: Self = Self {
        width: 40,
        height: 10,
    };

    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// The grid for a terminal: full width, all rows but the reserved ones.
    #[must_use]
    pub fn for_terminal(size: Option<Size>) -> Self {
        size.map_or(Self::DEFAULT, |s| {
            Self::new(s.cols, s.rows.saturating_sub(RESERVED_ROWS))
        })
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    #[inline]
    #[must_use]
    pub const fn bottom_row(self) -> u16 {
        self.height - 1
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Accumulation policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Flakes settle on the bottom row or on landed flakes.
    #[default]
    Pile,
    /// Flakes fall through everything and settle only on the bottom row.
    Burn,
}

impl Mode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pile => Self::Burn,
            Self::Burn => Self::Pile,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pile => "pile",
            Self::Burn => "burn",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

/// Airborne flakes.
pub type MovingSet = BTreeMap<Position, Flake>;

/// Landed flakes and sentinels.
pub type StaticSet = BTreeMap<Position, Flake>;

/// Whether `pos` holds a static flake that is not a sentinel.
fn solid_at(statics: &StaticSet, pos: Position) -> bool {
    statics.get(&pos).is_some_and(|f| !f.is_sentinel())
}

/// Move every flake one tick and return the new moving set.
///
/// `statics` is updated in place with flakes that land this tick. Every
/// cell change goes through `emitter`, and the hardware cursor is restored
/// to `cursor` afterwards.
///
/// # Errors
///
/// Returns an error if writing to the surface fails.
pub fn advance<S: Surface>(
    moving: MovingSet,
    statics: &mut StaticSet,
    size: GridSize,
    mode: Mode,
    emitter: &mut Emitter<S>,
    cursor: Cursor,
) -> io::Result<MovingSet> {
    let mut next = MovingSet::new();

    for (pos, flake) in moving.into_iter().rev() {
        emitter.clear_cell(pos.col, pos.row)?;

        let below = pos.below();
        let at_bottom = pos.row >= size.bottom_row();
        let lands = match mode {
            Mode::Pile => at_bottom || solid_at(statics, below),
            Mode::Burn => at_bottom,
        };

        if lands {
            emitter.draw_cell(pos.col, pos.row, flake.glyph, flake.color)?;
            statics.insert(pos, flake);
            continue;
        }

        match mode {
            // Only a sentinel can be below here; anything solid would have
            // stopped the flake.
            Mode::Pile => {
                if statics.get(&below).is_some_and(Flake::is_sentinel) {
                    statics.remove(&below);
                }
            }
            Mode::Burn => {
                statics.remove(&below);
            }
        }

        emitter.draw_cell(below.col, below.row, flake.glyph, flake.color)?;
        next.insert(below, flake);
    }

    emitter.restore_cursor(cursor)?;
    Ok(next)
}

/// Put `flake` in the air at `pos`, replacing any static occupant there.
///
/// Positions outside `size` are ignored and `false` is returned.
pub fn place(
    moving: &mut MovingSet,
    statics: &mut StaticSet,
    size: GridSize,
    pos: Position,
    flake: Flake,
) -> bool {
    if !size.contains(pos) {
        return false;
    }
    statics.remove(&pos);
    moving.insert(pos, flake);
    true
}

/// Start `flake` falling from the top of `column`.
pub fn spawn(
    moving: &mut MovingSet,
    statics: &mut StaticSet,
    size: GridSize,
    column: u16,
    flake: Flake,
) -> bool {
    place(moving, statics, size, Position::new(0, column), flake)
}

/// Clear every rendered cell of `set`, then empty it.
///
/// # Errors
///
/// Returns an error if writing to the surface fails.
pub fn clear_set<S: Surface>(
    set: &mut BTreeMap<Position, Flake>,
    emitter: &mut Emitter<S>,
) -> io::Result<()> {
    for pos in set.keys() {
        emitter.clear_cell(pos.col, pos.row)?;
    }
    set.clear();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use n_term::color::Rgb;
    use n_term::screen::VirtualScreen;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SIZE: GridSize = GridSize {
        width: 5,
        height: 4,
    };

    fn emitter() -> Emitter<VirtualScreen> {
        Emitter::new(VirtualScreen::new(SIZE.width, SIZE.height))
    }

    fn star() -> Flake {
        Flake::new('*', Rgb::WHITE)
    }

    fn step(
        moving: MovingSet,
        statics: &mut StaticSet,
        mode: Mode,
        em: &mut Emitter<VirtualScreen>,
    ) -> MovingSet {
        advance(moving, statics, SIZE, mode, em, Cursor::default()).unwrap()
    }

    // ── Position & size ─────────────────────────────────────────────

    #[test]
    fn positions_order_row_first() {
        assert!(Position::new(0, 4) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn position_display() {
        assert_eq!(Position::new(3, 12).to_string(), "(3, 12)");
    }

    #[test]
    fn grid_for_terminal_reserves_rows() {
        let g = GridSize::for_terminal(Some(Size { cols: 80, rows: 24 }));
        assert_eq!(g, GridSize::new(80, 18));
    }

    #[test]
    fn grid_for_tiny_terminal_is_at_least_one_cell() {
        let g = GridSize::for_terminal(Some(Size { cols: 1, rows: 3 }));
        assert_eq!(g, GridSize::new(1, 1));
        assert_eq!(g.height, 1);
    }

    #[test]
    fn grid_without_terminal_uses_default() {
        assert_eq!(GridSize::for_terminal(None), GridSize::DEFAULT);
    }

    #[test]
    fn mode_toggles_and_names() {
        assert_eq!(Mode::default(), Mode::Pile);
        assert_eq!(Mode::Pile.toggled(), Mode::Burn);
        assert_eq!(Mode::Burn.toggled(), Mode::Pile);
        assert_eq!(Mode::Burn.to_string(), "burn");
    }

    // ── Falling ─────────────────────────────────────────────────────

    #[test]
    fn flake_falls_one_row_per_tick() {
        let mut em = emitter();
        let mut statics = StaticSet::new();
        let moving = MovingSet::from([(Position::new(0, 2), star())]);

        let moving = step(moving, &mut statics, Mode::Pile, &mut em);
        assert_eq!(moving.keys().copied().collect::<Vec<_>>(), vec![Position::new(1, 2)]);
        assert_eq!(em.surface().char_at(2, 0), ' ');
        assert_eq!(em.surface().char_at(2, 1), '*');
    }

    #[test]
    fn flake_lands_on_bottom_row() {
        let mut em = emitter();
        let mut statics = StaticSet::new();
        let mut moving = MovingSet::from([(Position::new(0, 0), star())]);
        for _ in 0..SIZE.height {
            moving = step(moving, &mut statics, Mode::Pile, &mut em);
        }
        assert!(moving.is_empty());
        assert_eq!(statics.keys().copied().collect::<Vec<_>>(), vec![Position::new(3, 0)]);
        assert_eq!(em.surface().char_at(0, 3), '*');
    }

    #[test]
    fn cursor_is_restored_after_advance() {
        let mut em = emitter();
        let mut statics = StaticSet::new();
        let moving = MovingSet::from([(Position::new(0, 0), star())]);
        let cursor = Cursor::new(4, 2);
        advance(moving, &mut statics, SIZE, Mode::Pile, &mut em, cursor).unwrap();
        assert_eq!(em.surface().cursor(), (4, 2));
    }

    // ── Pile ────────────────────────────────────────────────────────

    #[test]
    fn pile_lands_on_solid_flake() {
        let mut em = emitter();
        let mut statics = StaticSet::from([(Position::new(3, 1), Flake::new('@', Rgb::WHITE))]);
        let moving = MovingSet::from([(Position::new(2, 1), star())]);

        let moving = step(moving, &mut statics, Mode::Pile, &mut em);
        assert!(moving.is_empty());
        assert_eq!(statics.get(&Position::new(2, 1)), Some(&star()));
        assert_eq!(statics.len(), 2);
    }

    #[test]
    fn pile_displaces_sentinel() {
        let mut em = emitter();
        let mut statics = StaticSet::from([(Position::new(2, 1), Flake::sentinel())]);
        let moving = MovingSet::from([(Position::new(1, 1), star())]);

        let moving = step(moving, &mut statics, Mode::Pile, &mut em);
        assert!(statics.is_empty());
        assert!(moving.contains_key(&Position::new(2, 1)));
    }

    #[test]
    fn pile_stacks_in_one_tick_bottom_up() {
        let mut em = emitter();
        let mut statics = StaticSet::new();
        let moving = MovingSet::from([
            (Position::new(2, 0), star()),
            (Position::new(3, 0), Flake::new('o', Rgb::WHITE)),
        ]);

        let moving = step(moving, &mut statics, Mode::Pile, &mut em);
        assert!(moving.is_empty());
        assert_eq!(statics.len(), 2);
        assert_eq!(em.surface().char_at(0, 2), '*');
        assert_eq!(em.surface().char_at(0, 3), 'o');
    }

    #[test]
    fn landing_on_sentinel_glyph_does_not_support() {
        // A landed '.' is itself passable for the next flake.
        let mut em = emitter();
        let mut statics = StaticSet::from([(Position::new(3, 4), Flake::sentinel())]);
        let moving = MovingSet::from([(Position::new(2, 4), star())]);

        let moving = step(moving, &mut statics, Mode::Pile, &mut em);
        assert_eq!(moving.keys().copied().collect::<Vec<_>>(), vec![Position::new(3, 4)]);
        assert!(statics.is_empty());
    }

    // ── Burn ────────────────────────────────────────────────────────

    #[test]
    fn burn_passes_through_solid_occupant() {
        let mut em = emitter();
        let mut statics = StaticSet::from([(Position::new(3, 2), Flake::new('@', Rgb::WHITE))]);
        let moving = MovingSet::from([(Position::new(2, 2), star())]);

        let moving = step(moving, &mut statics, Mode::Burn, &mut em);
        assert_eq!(moving.keys().copied().collect::<Vec<_>>(), vec![Position::new(3, 2)]);
        assert!(statics.is_empty());

        let moving = step(moving, &mut statics, Mode::Burn, &mut em);
        assert!(moving.is_empty());
        assert_eq!(statics.get(&Position::new(3, 2)), Some(&star()));
    }

    #[test]
    fn burn_never_lands_early() {
        let mut em = emitter();
        let mut statics = StaticSet::from([
            (Position::new(1, 0), Flake::new('@', Rgb::WHITE)),
            (Position::new(2, 0), Flake::new('o', Rgb::WHITE)),
        ]);
        let mut moving = MovingSet::from([(Position::new(0, 0), star())]);
        for _ in 0..SIZE.height {
            moving = step(moving, &mut statics, Mode::Burn, &mut em);
        }
        assert!(moving.is_empty());
        assert_eq!(statics.keys().copied().collect::<Vec<_>>(), vec![Position::new(3, 0)]);
    }

    // ── Spawn, place, clear ─────────────────────────────────────────

    #[test]
    fn spawn_starts_at_row_zero() {
        let mut moving = MovingSet::new();
        let mut statics = StaticSet::new();
        assert!(spawn(&mut moving, &mut statics, SIZE, 3, star()));
        assert!(moving.contains_key(&Position::new(0, 3)));
    }

    #[test]
    fn spawn_outside_grid_is_ignored() {
        let mut moving = MovingSet::new();
        let mut statics = StaticSet::new();
        assert!(!spawn(&mut moving, &mut statics, SIZE, SIZE.width, star()));
        assert!(moving.is_empty());
    }

    #[test]
    fn place_replaces_landed_flake() {
        let pos = Position::new(3, 3);
        let mut moving = MovingSet::new();
        let mut statics = StaticSet::from([(pos, Flake::new('@', Rgb::WHITE))]);
        assert!(place(&mut moving, &mut statics, SIZE, pos, star()));
        assert!(statics.is_empty());
        assert_eq!(moving.get(&pos), Some(&star()));
    }

    #[test]
    fn clear_set_empties_and_blanks() {
        let mut em = emitter();
        let mut statics = StaticSet::new();
        let mut moving = MovingSet::from([
            (Position::new(0, 0), star()),
            (Position::new(0, 4), star()),
        ]);
        moving = step(moving, &mut statics, Mode::Pile, &mut em);
        assert!(!em.surface().is_blank());

        clear_set(&mut moving, &mut em).unwrap();
        clear_set(&mut statics, &mut em).unwrap();
        assert!(moving.is_empty());
        assert!(statics.is_empty());
        assert!(em.surface().is_blank());
    }

    // ── Invariants ──────────────────────────────────────────────────

    #[derive(Debug, Clone)]
    enum Op {
        Spawn(u16, char),
        Place(u16, u16, char),
        Tick(Mode),
    }

    fn op() -> impl Strategy<Value = Op> {
        let glyph = prop::sample::select(vec!['.', '+', '*', 'o', '@']);
        prop_oneof![
            (0..SIZE.width, glyph.clone()).prop_map(|(c, g)| Op::Spawn(c, g)),
            (0..SIZE.height, 0..SIZE.width, glyph).prop_map(|(r, c, g)| Op::Place(r, c, g)),
            prop_oneof![Just(Mode::Pile), Just(Mode::Burn)].prop_map(Op::Tick),
        ]
    }

    proptest! {
        #[test]
        fn sets_stay_disjoint_and_in_bounds(ops in prop::collection::vec(op(), 0..80)) {
            let mut em = emitter();
            let mut moving = MovingSet::new();
            let mut statics = StaticSet::new();

            for op in ops {
                match op {
                    Op::Spawn(col, g) => {
                        spawn(&mut moving, &mut statics, SIZE, col, Flake::new(g, Rgb::WHITE));
                    }
                    Op::Place(row, col, g) => {
                        let pos = Position::new(row, col);
                        place(&mut moving, &mut statics, SIZE, pos, Flake::new(g, Rgb::WHITE));
                    }
                    Op::Tick(mode) => {
                        moving = step(moving, &mut statics, mode, &mut em);
                    }
                }

                for pos in moving.keys() {
                    prop_assert!(!statics.contains_key(pos), "{pos} in both sets");
                    prop_assert!(SIZE.contains(*pos));
                }
                for pos in statics.keys() {
                    prop_assert!(SIZE.contains(*pos));
                }
            }
        }

        #[test]
        fn every_flake_eventually_lands(cols in prop::collection::vec(0..SIZE.width, 1..10)) {
            let mut em = emitter();
            let mut moving = MovingSet::new();
            let mut statics = StaticSet::new();
            for col in &cols {
                spawn(&mut moving, &mut statics, SIZE, *col, star());
            }
            for _ in 0..SIZE.height {
                moving = step(moving, &mut statics, Mode::Pile, &mut em);
            }
            prop_assert!(moving.is_empty());
        }
    }
}
