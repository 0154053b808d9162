// SPDX-License-Identifier: MIT
//
// n-term color: plain 24-bit sRGB triples.
//
// The snowfall only ever paints foreground glyphs in TrueColor, so the color
// type is a bare `(r, g, b)` triple. Palettes live in n-theme; this module
// only knows how to name, parse, and print a color.

use std::fmt;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// A 24-bit sRGB color.
///
/// # Examples
///
/// ```
/// use n_term::color::Rgb;
///
/// let ice = Rgb::new(173, 216, 230);
/// assert_eq!(ice.to_hex(), "#add8e6");
/// assert_eq!(Rgb::hex("#add8e6"), Some(ice));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its three 8-bit channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`. Returns `None` for anything else.
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c = Rgb::new(106, 90, 205);
        assert_eq!(Rgb::hex(&c.to_hex()), Some(c));
    }

    #[test]
    fn hex_without_hash() {
        assert_eq!(Rgb::hex("00ffff"), Some(Rgb::new(0, 255, 255)));
    }

    #[test]
    fn hex_rejects_short_input() {
        assert_eq!(Rgb::hex("#fff"), None);
    }

    #[test]
    fn hex_rejects_non_hex_digits() {
        assert_eq!(Rgb::hex("#gg0000"), None);
    }

    #[test]
    fn hex_rejects_multibyte() {
        assert_eq!(Rgb::hex("#ééé"), None);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Rgb::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn debug_lists_channels() {
        assert_eq!(format!("{:?}", Rgb::new(1, 2, 3)), "Rgb(1, 2, 3)");
    }

    #[test]
    fn from_tuple() {
        assert_eq!(Rgb::from((0, 0, 255)), Rgb::new(0, 0, 255));
    }
}
