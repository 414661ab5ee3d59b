//! Character to keycode table for a US-ASCII layout.
//!
//! Every printable ASCII character plus the control characters a terminal
//! sends for Enter, Tab and Backspace maps to the key that types it, and a
//! flag saying whether Shift must be held. ESC (0x1B) is deliberately
//! absent: it only ever reaches the table after the decoder has consumed it.

use crate::types::{KeyEvent, Keycode, Modifiers};

/// Look up the key that types `byte`.
///
/// Returns `(keycode, needs_shift)`, or `None` for bytes that have no key
/// on this layout (other control characters, ESC, non-ASCII).
///
/// # Example
///
/// ```
/// use keyboard_core::{keymap, Keycode};
///
/// assert_eq!(keymap::lookup(b'a'), Some((Keycode::A, false)));
/// assert_eq!(keymap::lookup(b'?'), Some((Keycode::SLASH, true)));
/// assert_eq!(keymap::lookup(0x1B), None);
/// ```
#[must_use]
pub const fn lookup(byte: u8) -> Option<(Keycode, bool)> {
    let mapped = match byte {
        b'a'..=b'z' => (Keycode(Keycode::A.0 + (byte - b'a')), false),
        b'A'..=b'Z' => (Keycode(Keycode::A.0 + (byte - b'A')), true),
        b'1'..=b'9' => (Keycode(Keycode::DIGIT_1.0 + (byte - b'1')), false),
        b'0' => (Keycode::DIGIT_0, false),

        b' ' => (Keycode::SPACE, false),
        b'\r' | b'\n' => (Keycode::ENTER, false),
        b'\t' => (Keycode::TAB, false),
        0x08 | 0x7F => (Keycode::BACKSPACE, false),

        b'-' => (Keycode::MINUS, false),
        b'=' => (Keycode::EQUAL, false),
        b'[' => (Keycode::BRACKET_LEFT, false),
        b']' => (Keycode::BRACKET_RIGHT, false),
        b'\\' => (Keycode::BACKSLASH, false),
        b';' => (Keycode::SEMICOLON, false),
        b'\'' => (Keycode::APOSTROPHE, false),
        b'`' => (Keycode::GRAVE, false),
        b',' => (Keycode::COMMA, false),
        b'.' => (Keycode::PERIOD, false),
        b'/' => (Keycode::SLASH, false),

        // Shifted number row
        b'!' => (Keycode::DIGIT_1, true),
        b'@' => (Keycode(Keycode::DIGIT_1.0 + 1), true),
        b'#' => (Keycode(Keycode::DIGIT_1.0 + 2), true),
        b'$' => (Keycode(Keycode::DIGIT_1.0 + 3), true),
        b'%' => (Keycode(Keycode::DIGIT_1.0 + 4), true),
        b'^' => (Keycode(Keycode::DIGIT_1.0 + 5), true),
        b'&' => (Keycode(Keycode::DIGIT_1.0 + 6), true),
        b'*' => (Keycode(Keycode::DIGIT_1.0 + 7), true),
        b'(' => (Keycode::DIGIT_9, true),
        b')' => (Keycode::DIGIT_0, true),

        // Shifted punctuation
        b'_' => (Keycode::MINUS, true),
        b'+' => (Keycode::EQUAL, true),
        b'{' => (Keycode::BRACKET_LEFT, true),
        b'}' => (Keycode::BRACKET_RIGHT, true),
        b'|' => (Keycode::BACKSLASH, true),
        b':' => (Keycode::SEMICOLON, true),
        b'"' => (Keycode::APOSTROPHE, true),
        b'~' => (Keycode::GRAVE, true),
        b'<' => (Keycode::COMMA, true),
        b'>' => (Keycode::PERIOD, true),
        b'?' => (Keycode::SLASH, true),

        _ => return None,
    };
    Some(mapped)
}

/// Look up `byte` and build the key event that types it.
#[must_use]
pub const fn key_event(byte: u8) -> Option<KeyEvent> {
    match lookup(byte) {
        Some((keycode, true)) => Some(KeyEvent::new(keycode, Modifiers::LEFT_SHIFT)),
        Some((keycode, false)) => Some(KeyEvent::new(keycode, Modifiers::NONE)),
        None => None,
    }
}
