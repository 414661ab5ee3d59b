//! Tunable timing and queueing parameters.

/// Default key-down hold time, long enough for host debounce and polling.
pub const DEFAULT_PRESS_HOLD_MS: u32 = 50;

/// Default pause after a key-up before the next keystroke.
pub const DEFAULT_RELEASE_GAP_MS: u32 = 10;

/// Default depth of the dispatcher queue, in keystrokes.
pub const DISPATCH_DEPTH: usize = 32;

/// Maximum number of concurrent remote shell sources.
pub const MAX_REMOTE_SOURCES: usize = 3;

/// Report emitter timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmitterConfig {
    /// Time between the key-down and key-up reports.
    pub press_hold_ms: u32,
    /// Time after the key-up report before the next keystroke.
    pub release_gap_ms: u32,
}

impl EmitterConfig {
    #[must_use]
    pub const fn new(press_hold_ms: u32, release_gap_ms: u32) -> Self {
        Self {
            press_hold_ms,
            release_gap_ms,
        }
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PRESS_HOLD_MS, DEFAULT_RELEASE_GAP_MS)
    }
}

/// What a producer does when the dispatcher queue is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchPolicy {
    /// Wait for room. No keystroke is lost; a slow host slows the source.
    #[default]
    Block,
    /// Drop the new keystroke and count it.
    DropNewest,
}
