//! Terminal escape-sequence decoder.
//!
//! Resegments a raw terminal byte stream into printable literals and
//! navigation keys. The decoder is fed one byte at a time and carries all
//! of its state between calls, so input may be split across reads at any
//! byte boundary.
//!
//! # Recognized sequences
//!
//! | Bytes         | Key        |
//! |---------------|------------|
//! | `ESC [ A`     | Arrow up   |
//! | `ESC [ B`     | Arrow down |
//! | `ESC [ C`     | Arrow right|
//! | `ESC [ D`     | Arrow left |
//! | `ESC [ H`     | Home       |
//! | `ESC [ F`     | End        |
//! | `ESC [ 1 ~`   | Home       |
//! | `ESC [ 2 ~`   | Insert     |
//! | `ESC [ 3 ~`   | Delete     |
//! | `ESC [ 4 ~`   | End        |
//! | `ESC [ 5 ~`   | Page up    |
//! | `ESC [ 6 ~`   | Page down  |
//!
//! Anything else that starts with `ESC [` is discarded without output. A
//! bare ESC followed by a non-`[` byte is dropped and the byte is decoded
//! as if the ESC had never arrived.

use heapless::Vec;

use crate::keymap;
use crate::types::{KeyEvent, Keycode};

/// Default capacity of the escape accumulation buffer, in bytes.
pub const DECODER_CAPACITY: usize = 8;

const ESC: u8 = 0x1B;

/// Position of the decoder within an escape sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderState {
    /// Not inside a sequence.
    Idle,
    /// `ESC` seen.
    SawEsc,
    /// `ESC [` seen.
    SawBracket,
    /// `ESC [` followed by one or more decimal digits.
    InNumericParam,
}

/// Navigation keys reachable through escape sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    ArrowRight,
    ArrowLeft,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
}

impl NavKey {
    /// HID keycode for this key.
    #[must_use]
    pub const fn keycode(self) -> Keycode {
        match self {
            NavKey::ArrowUp => Keycode::ARROW_UP,
            NavKey::ArrowDown => Keycode::ARROW_DOWN,
            NavKey::ArrowRight => Keycode::ARROW_RIGHT,
            NavKey::ArrowLeft => Keycode::ARROW_LEFT,
            NavKey::Home => Keycode::HOME,
            NavKey::End => Keycode::END,
            NavKey::Insert => Keycode::INSERT,
            NavKey::Delete => Keycode::DELETE,
            NavKey::PageUp => Keycode::PAGE_UP,
            NavKey::PageDown => Keycode::PAGE_DOWN,
        }
    }

    /// Final byte of a short `ESC [ x` sequence.
    const fn from_final(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(NavKey::ArrowUp),
            b'B' => Some(NavKey::ArrowDown),
            b'C' => Some(NavKey::ArrowRight),
            b'D' => Some(NavKey::ArrowLeft),
            b'H' => Some(NavKey::Home),
            b'F' => Some(NavKey::End),
            _ => None,
        }
    }

    /// Parameter of an `ESC [ n ~` sequence.
    fn from_param(digits: &[u8]) -> Option<Self> {
        match digits {
            b"1" => Some(NavKey::Home),
            b"2" => Some(NavKey::Insert),
            b"3" => Some(NavKey::Delete),
            b"4" => Some(NavKey::End),
            b"5" => Some(NavKey::PageUp),
            b"6" => Some(NavKey::PageDown),
            _ => None,
        }
    }
}

/// One resolved input unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decoded {
    /// A byte outside any escape sequence, to be looked up in the keymap.
    Literal(u8),
    /// A complete navigation sequence.
    Navigation(NavKey),
}

impl Decoded {
    /// Key event that types this unit, or `None` for a literal with no key.
    #[must_use]
    pub fn key_event(self) -> Option<KeyEvent> {
        match self {
            Decoded::Literal(byte) => keymap::key_event(byte),
            Decoded::Navigation(key) => Some(KeyEvent::plain(key.keycode())),
        }
    }
}

/// Per-source escape-sequence state machine.
///
/// `N` bounds the number of pending escape bytes. A sequence that would
/// grow past it is discarded and the decoder returns to
/// [`DecoderState::Idle`], so malformed input can never wedge it.
///
/// # Example
///
/// ```
/// use keyboard_core::{Decoded, Decoder, NavKey};
///
/// let mut decoder: Decoder = Decoder::new();
/// assert_eq!(decoder.push(0x1B), None);
/// assert_eq!(decoder.push(b'['), None);
/// assert_eq!(decoder.push(b'A'), Some(Decoded::Navigation(NavKey::ArrowUp)));
/// assert_eq!(decoder.push(b'x'), Some(Decoded::Literal(b'x')));
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<const N: usize = DECODER_CAPACITY> {
    buffer: Vec<u8, N>,
    state: DecoderState,
}

impl<const N: usize> Decoder<N> {
    /// Create an idle decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            state: DecoderState::Idle,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Bytes of the sequence accumulated so far.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Drop any partial sequence and return to idle.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = DecoderState::Idle;
    }

    /// Feed one byte.
    ///
    /// Returns the unit this byte completes, or `None` while a sequence is
    /// still accumulating or after one was discarded.
    pub fn push(&mut self, byte: u8) -> Option<Decoded> {
        match self.state {
            DecoderState::Idle => self.push_idle(byte),
            DecoderState::SawEsc => {
                if byte == b'[' {
                    self.accumulate(byte, DecoderState::SawBracket);
                    None
                } else {
                    // Bare ESC: drop it and decode this byte from scratch.
                    trace!("bare ESC dropped before {:#x}", byte);
                    self.reset();
                    self.push_idle(byte)
                }
            }
            DecoderState::SawBracket => {
                if let Some(key) = NavKey::from_final(byte) {
                    self.reset();
                    Some(Decoded::Navigation(key))
                } else if byte.is_ascii_digit() {
                    self.accumulate(byte, DecoderState::InNumericParam);
                    None
                } else {
                    self.discard(byte);
                    None
                }
            }
            DecoderState::InNumericParam => {
                if byte.is_ascii_digit() {
                    self.accumulate(byte, DecoderState::InNumericParam);
                    None
                } else if byte == b'~' {
                    // Buffer is `ESC [ digits...`
                    let resolved = NavKey::from_param(&self.buffer[2..]);
                    if resolved.is_none() {
                        debug!("unknown numeric sequence {:?}", &self.buffer[2..]);
                    }
                    self.reset();
                    resolved.map(Decoded::Navigation)
                } else {
                    self.discard(byte);
                    None
                }
            }
        }
    }

    /// Feed a chunk of bytes, yielding each resolved unit lazily.
    ///
    /// Bytes are consumed only as the iterator is advanced; dropping it
    /// early leaves the remaining bytes unread and the decoder state valid.
    pub fn decode<'a>(&'a mut self, bytes: &'a [u8]) -> impl Iterator<Item = Decoded> + 'a {
        bytes.iter().filter_map(move |&byte| self.push(byte))
    }

    fn push_idle(&mut self, byte: u8) -> Option<Decoded> {
        if byte == ESC {
            self.buffer.clear();
            self.accumulate(byte, DecoderState::SawEsc);
            None
        } else {
            Some(Decoded::Literal(byte))
        }
    }

    /// Append `byte` and move to `next`, or reset if the buffer is full.
    fn accumulate(&mut self, byte: u8, next: DecoderState) {
        if self.buffer.push(byte).is_err() {
            debug!("escape buffer overflow ({} bytes), sequence dropped", N);
            self.reset();
        } else {
            self.state = next;
        }
    }

    fn discard(&mut self, terminator: u8) {
        debug!(
            "unrecognized sequence {:?} + {:#x} dropped",
            &self.buffer[..],
            terminator
        );
        self.reset();
    }
}

impl<const N: usize> Default for Decoder<N> {
    fn default() -> Self {
        Self::new()
    }
}
