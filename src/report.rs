//! HID boot keyboard report.

use crate::types::{KeyEvent, Keycode, Modifiers};

/// Number of simultaneous key slots in a boot keyboard report.
pub const KEY_SLOTS: usize = 6;

/// USB HID boot keyboard input report.
///
/// Wire layout (8 bytes): modifier byte, reserved byte, six key slots.
/// This crate only ever fills slot 0; a report with every slot zero is the
/// "all keys released" report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifiers: Modifiers,
    pub keycodes: [u8; KEY_SLOTS],
}

impl KeyboardReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 8;

    /// The "all keys released" report.
    #[must_use]
    pub const fn released() -> Self {
        Self {
            modifiers: Modifiers::NONE,
            keycodes: [0; KEY_SLOTS],
        }
    }

    /// The "key down" report for a single keystroke.
    #[must_use]
    pub const fn pressed(event: KeyEvent) -> Self {
        Self {
            modifiers: event.modifiers,
            keycodes: [event.keycode.raw(), 0, 0, 0, 0, 0],
        }
    }

    /// Check if no key and no modifier is held.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.modifiers.is_empty() && self.keycodes.iter().all(|&k| k == Keycode::NONE.raw())
    }

    /// Convert the report to bytes.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let k = &self.keycodes;
        [self.modifiers.raw(), 0, k[0], k[1], k[2], k[3], k[4], k[5]]
    }
}

impl From<KeyEvent> for KeyboardReport {
    fn from(event: KeyEvent) -> Self {
        Self::pressed(event)
    }
}
