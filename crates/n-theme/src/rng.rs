//! Injected randomness.
//!
//! Every random choice in n-snow (spawn column, flake glyph and color, tree
//! swatches) goes through a [`RandomSource`], so a test can pin the sequence
//! with a fixed seed and assert on exact output.

/// A source of uniformly distributed `u32` values.
///
/// Only [`next_u32`](Self::next_u32) is required; [`below`](Self::below) and
/// [`pick`](Self::pick) are derived from it.
pub trait RandomSource {
    /// The next raw value.
    fn next_u32(&mut self) -> u32;

    /// A value in `0..n`. Returns 0 when `n == 0`.
    fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        (self.next_u32() as usize) % n
    }

    /// A random element of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is empty.
    fn pick<'a, T>(&mut self, slice: &'a [T]) -> &'a T {
        &slice[self.below(slice.len())]
    }
}

// ---------------------------------------------------------------------------
// Xorshift32: a minimal deterministic PRNG
// ---------------------------------------------------------------------------

/// Minimal deterministic PRNG. No external `rand` crate needed.
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// A generator with a fixed seed. A zero seed is bumped to 1, since the
    /// all-zero state is a fixed point of xorshift.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    /// A generator seeded from the sub-second part of the wall clock.
    #[must_use]
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(42, |d| d.subsec_nanos());
        Self::new(seed)
    }
}

impl RandomSource for Xorshift32 {
    fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift32::new(7);
        let mut b = Xorshift32::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Xorshift32::new(1);
        let mut b = Xorshift32::new(2);
        let sa: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let sb: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(sa, sb);
    }

    #[test]
    fn zero_seed_is_not_stuck() {
        let mut rng = Xorshift32::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = Xorshift32::new(99);
        for n in 1..50 {
            assert!(rng.below(n) < n);
        }
    }

    #[test]
    fn below_zero_is_zero() {
        let mut rng = Xorshift32::new(5);
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn pick_single_element() {
        let mut rng = Xorshift32::new(3);
        assert_eq!(*rng.pick(&['x']), 'x');
    }

    #[test]
    fn pick_covers_all_elements_eventually() {
        let mut rng = Xorshift32::new(11);
        let items = ['a', 'b', 'c', 'd'];
        let mut seen = [false; 4];
        for _ in 0..200 {
            let c = *rng.pick(&items);
            seen[items.iter().position(|&i| i == c).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn from_clock_produces_values() {
        let mut rng = Xorshift32::from_clock();
        let _ = rng.next_u32();
    }
}
