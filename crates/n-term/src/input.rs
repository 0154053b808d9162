// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. The snowfall only listens for a
// handful of keys, but the parser still has to walk everything the terminal
// can send so that an unrecognised sequence is consumed whole instead of
// leaking its tail as stray characters:
//
// - Legacy CSI sequences (arrows with optional modifiers, tilde keys)
// - SS3 sequences (arrows in application cursor mode)
// - Control characters (Ctrl+letter)
// - Alt+key (ESC followed by a printable character)
// - UTF-8 multi-byte characters
//
// # Design
//
// The parser keeps a small internal byte buffer because escape sequences
// can span multiple `read()` calls. Feed bytes with [`Parser::advance`],
// retrieve events from the returned `Vec`. After a timeout with no new
// bytes, call [`Parser::flush`] to emit any pending lone ESC as a real
// Escape keypress.

use bitflags::bitflags;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl).
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key with the given modifiers.
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Ctrl+C: the in-band interrupt when the terminal doesn't raise SIGINT.
    #[must_use]
    pub const fn is_interrupt(&self) -> bool {
        matches!(self.code, KeyCode::Char('c')) && self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character (printable, or the letter of a Ctrl chord).
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// Any other recognised key (Insert, Delete, Page keys, function keys).
    Other,
}

bitflags! {
    /// Keyboard modifier flags, xterm encoding (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte (0x1B) could be either a standalone Escape keypress
/// or the start of a multi-byte escape sequence. The parser holds a lone
/// ESC as pending. The caller waits a short timeout and then calls
/// [`flush`](Parser::flush) to emit it as a real Escape key event.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes from stdin and return all keys that can be parsed.
    ///
    /// Bytes that form an incomplete sequence stay buffered and combine
    /// with future calls.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    events.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as literal key events.
    ///
    /// A lone ESC becomes Escape; `ESC [` with nothing after it becomes
    /// Escape followed by `[`.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let events = self
            .buf
            .iter()
            .filter_map(|&byte| match byte {
                0x1B => Some(KeyEvent::plain(KeyCode::Escape)),
                b @ 0x01..=0x1A => Some(KeyEvent::with(
                    KeyCode::Char((b + b'a' - 1) as char),
                    Modifiers::CTRL,
                )),
                0x7F => Some(KeyEvent::plain(KeyCode::Backspace)),
                b @ 0x20..=0x7E => Some(KeyEvent::plain(KeyCode::Char(b as char))),
                _ => None,
            })
            .collect();
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

/// Result of trying to parse one key from the front of a byte slice.
enum Parsed {
    /// A key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Sequence is incomplete; need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        0x1B => parse_escape(buf),
        0x09 => Parsed::Key(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(KeyEvent::plain(KeyCode::Enter), 1),
        0x08 | 0x7F => Parsed::Key(KeyEvent::plain(KeyCode::Backspace), 1),
        b @ 0x01..=0x1A => Parsed::Key(
            KeyEvent::with(KeyCode::Char((b + b'a' - 1) as char), Modifiers::CTRL),
            1,
        ),
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::plain(KeyCode::Char(b as char)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Key(KeyEvent::with(KeyCode::Escape, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Parsed::Key(
            KeyEvent::with(KeyCode::Char(b as char), Modifiers::ALT),
            2,
        ),
        // Unknown byte after ESC: emit standalone Escape.
        _ => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter bytes are 0x30..=0x3F, intermediates 0x20..=0x2F, and the
    // final byte 0x40..=0x7E.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let params = parse_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params
        .get(1)
        .map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match buf[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            4 | 8 => KeyCode::End,
            2..=6 | 11..=34 => KeyCode::Other,
            _ => return Parsed::Skip(consumed),
        },
        b'P'..=b'S' => KeyCode::Other,
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Key(KeyEvent::with(code, modifiers), consumed)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P'..=b'S' => KeyCode::Other,
        _ => return Parsed::Skip(3),
    };

    Parsed::Key(KeyEvent::plain(code), 3)
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected]).map_or(Parsed::Skip(1), |s| {
        s.chars().next().map_or(Parsed::Skip(expected), |ch| {
            Parsed::Key(KeyEvent::plain(KeyCode::Char(ch)), expected)
        })
    })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Semicolon-separated decimal parameters. Empty fields parse as 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// xterm modifier parameter: `1 + (shift | alt<<1 | ctrl<<2)`.
#[allow(clippy::cast_possible_truncation)] // Only the low 3 bits matter.
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 sequence from its lead byte (0 = invalid).
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
