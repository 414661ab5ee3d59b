//! Core keyboard types: Keycode, Modifiers, KeyEvent.

use core::ops::{BitOr, BitOrAssign};

/// USB HID keyboard usage ID (usage page 0x07).
///
/// Only the keys this crate can produce are named; the inner value is
/// public so other usages can still be expressed.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Keycode(pub u8);

impl Keycode {
    /// No key (empty report slot).
    pub const NONE: Self = Self(0x00);

    pub const A: Self = Self(0x04);
    pub const Z: Self = Self(0x1D);
    pub const DIGIT_1: Self = Self(0x1E);
    pub const DIGIT_9: Self = Self(0x26);
    pub const DIGIT_0: Self = Self(0x27);

    pub const ENTER: Self = Self(0x28);
    pub const ESCAPE: Self = Self(0x29);
    pub const BACKSPACE: Self = Self(0x2A);
    pub const TAB: Self = Self(0x2B);
    pub const SPACE: Self = Self(0x2C);
    pub const MINUS: Self = Self(0x2D);
    pub const EQUAL: Self = Self(0x2E);
    pub const BRACKET_LEFT: Self = Self(0x2F);
    pub const BRACKET_RIGHT: Self = Self(0x30);
    pub const BACKSLASH: Self = Self(0x31);
    pub const SEMICOLON: Self = Self(0x33);
    pub const APOSTROPHE: Self = Self(0x34);
    pub const GRAVE: Self = Self(0x35);
    pub const COMMA: Self = Self(0x36);
    pub const PERIOD: Self = Self(0x37);
    pub const SLASH: Self = Self(0x38);

    pub const INSERT: Self = Self(0x49);
    pub const HOME: Self = Self(0x4A);
    pub const PAGE_UP: Self = Self(0x4B);
    pub const DELETE: Self = Self(0x4C);
    pub const END: Self = Self(0x4D);
    pub const PAGE_DOWN: Self = Self(0x4E);
    pub const ARROW_RIGHT: Self = Self(0x4F);
    pub const ARROW_LEFT: Self = Self(0x50);
    pub const ARROW_DOWN: Self = Self(0x51);
    pub const ARROW_UP: Self = Self(0x52);

    /// Get the raw usage ID.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Modifier byte of a keyboard report, as a bitmask.
///
/// Bit positions follow the HID boot keyboard layout. Only Shift is ever
/// synthesized; the other bits are named so reports can be inspected.
///
/// # Example
///
/// ```
/// use keyboard_core::Modifiers;
///
/// let mods = Modifiers::NONE | Modifiers::LEFT_SHIFT;
/// assert!(mods.contains(Modifiers::LEFT_SHIFT));
/// assert_eq!(mods.raw(), 0x02);
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const LEFT_CTRL: Self = Self(1 << 0);
    pub const LEFT_SHIFT: Self = Self(1 << 1);
    pub const LEFT_ALT: Self = Self(1 << 2);
    pub const LEFT_GUI: Self = Self(1 << 3);

    /// Check if all bits of `other` are set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if no modifier is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the raw modifier byte.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One resolved keystroke: a single key plus the modifiers held with it.
///
/// Produced once per decoded input unit and consumed exactly once by the
/// report emitter, which turns it into a press/release report pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub keycode: Keycode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(keycode: Keycode, modifiers: Modifiers) -> Self {
        Self { keycode, modifiers }
    }

    /// A key pressed without modifiers.
    #[must_use]
    pub const fn plain(keycode: Keycode) -> Self {
        Self::new(keycode, Modifiers::NONE)
    }

    /// A key pressed with Shift held.
    #[must_use]
    pub const fn shifted(keycode: Keycode) -> Self {
        Self::new(keycode, Modifiers::LEFT_SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_bitwise_or() {
        let mut mods = Modifiers::NONE;
        assert!(mods.is_empty());
        mods |= Modifiers::LEFT_SHIFT;
        assert!(mods.contains(Modifiers::LEFT_SHIFT));
        assert!(!mods.contains(Modifiers::LEFT_CTRL));
        assert_eq!((mods | Modifiers::LEFT_ALT).raw(), 0x06);
    }

    #[test]
    fn test_key_event_constructors() {
        assert_eq!(KeyEvent::plain(Keycode::A).modifiers, Modifiers::NONE);
        assert_eq!(
            KeyEvent::shifted(Keycode::A),
            KeyEvent::new(Keycode::A, Modifiers::LEFT_SHIFT)
        );
    }

    #[test]
    fn test_keycode_ranges() {
        assert_eq!(Keycode::Z.raw() - Keycode::A.raw(), 25);
        assert_eq!(Keycode::DIGIT_9.raw() - Keycode::DIGIT_1.raw(), 8);
        assert_eq!(Keycode::DIGIT_0.raw(), Keycode::DIGIT_9.raw() + 1);
    }
}
