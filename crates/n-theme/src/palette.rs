//! Fixed palettes: flake glyphs, snow colors, and the per-token choices the
//! tree is recolored from.

use n_term::color::Rgb;

// ---------------------------------------------------------------------------
// Snow
// ---------------------------------------------------------------------------

/// Glyphs a flake can be drawn with.
pub const FLAKE_GLYPHS: [char; 5] = ['.', '+', '*', 'o', '@'];

/// The placeholder glyph: occupies a static cell but lets flakes fall through.
pub const SENTINEL: char = '.';

/// Colors a flake can be painted in.
pub const SNOW_COLORS: [Rgb; 10] = [
    Rgb::new(255, 255, 255), // white
    Rgb::new(192, 192, 192), // grey
    Rgb::new(211, 211, 211), // light grey
    Rgb::new(173, 216, 230), // light blue
    Rgb::new(0, 0, 255),     // blue
    Rgb::new(0, 255, 255),   // cyan
    Rgb::new(224, 255, 255), // light cyan
    Rgb::new(106, 90, 205),  // slate blue
    Rgb::new(176, 224, 230), // powder blue
    Rgb::new(240, 248, 255), // alice blue
];

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// The replacement choices for one token of the tree art.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPalette {
    /// The single character that marks this part in the canonical art.
    pub token: char,
    pub name: &'static str,
    pub glyphs: &'static [char],
    pub colors: &'static [Rgb],
}

pub const STAR: TokenPalette = TokenPalette {
    token: 'S',
    name: "star",
    glyphs: &['*', '+', 'x'],
    colors: &[
        Rgb::new(255, 215, 0),
        Rgb::new(255, 255, 0),
        Rgb::new(255, 165, 0),
    ],
};

pub const NEEDLES: TokenPalette = TokenPalette {
    token: 'G',
    name: "needles",
    glyphs: &['^', '*', '#'],
    colors: &[
        Rgb::new(0, 128, 0),
        Rgb::new(34, 139, 34),
        Rgb::new(0, 100, 0),
        Rgb::new(46, 139, 87),
    ],
};

pub const ORNAMENT: TokenPalette = TokenPalette {
    token: 'O',
    name: "ornament",
    glyphs: &['o', 'O', '@'],
    colors: &[
        Rgb::new(220, 20, 60),
        Rgb::new(255, 0, 255),
        Rgb::new(255, 215, 0),
        Rgb::new(30, 144, 255),
    ],
};

pub const LIGHT: TokenPalette = TokenPalette {
    token: 'L',
    name: "light",
    glyphs: &['*', '+', '\''],
    colors: &[
        Rgb::new(255, 255, 224),
        Rgb::new(255, 255, 255),
        Rgb::new(0, 255, 255),
        Rgb::new(255, 182, 193),
    ],
};

pub const TRUNK: TokenPalette = TokenPalette {
    token: 'T',
    name: "trunk",
    glyphs: &['|', '#', 'H'],
    colors: &[Rgb::new(139, 69, 19), Rgb::new(160, 82, 45)],
};

/// Every token the canonical tree art uses.
pub const TREE_TOKENS: [TokenPalette; 5] = [STAR, NEEDLES, ORNAMENT, LIGHT, TRUNK];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
