//! Keyboard sink trait, mount flag and error types.

use core::future::Future;
use portable_atomic::{AtomicBool, Ordering};

use crate::report::KeyboardReport;

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// USB/communication I/O error.
    Io,
    /// Device not ready (e.g., USB not enumerated).
    NotReady,
}

/// Async trait for HID keyboard report sinks.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait KeyboardSink {
    /// Send one keyboard report.
    ///
    /// May block until the previous report has been sent.
    fn send_report(
        &mut self,
        report: &KeyboardReport,
    ) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the host is ready to receive reports.
    ///
    /// Polled before every keystroke; a `false` here drops the keystroke.
    fn is_ready(&self) -> bool;
}

/// Host mount state of the HID endpoint.
///
/// Written by the USB stack's bus callbacks and read by the sink. The
/// endpoint is mounted while the host has it configured and the bus is
/// not suspended; a resume restores the configured state without a new
/// enumeration. A reader may observe a value one transition stale, which
/// only decides whether a keystroke is dropped.
#[derive(Debug, Default)]
pub struct MountFlag {
    configured: AtomicBool,
    suspended: AtomicBool,
}

impl MountFlag {
    /// Create an unmounted flag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            configured: AtomicBool::new(false),
            suspended: AtomicBool::new(false),
        }
    }

    /// Record a configuration change (SET_CONFIGURATION or deconfigure).
    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::Release);
    }

    /// Record a bus suspend or resume.
    pub fn set_suspended(&self, suspended: bool) {
        self.suspended.store(suspended, Ordering::Release);
    }

    /// Forget everything after a bus reset.
    pub fn reset(&self) {
        self.set_configured(false);
        self.set_suspended(false);
    }

    /// Check if the host has the device configured and awake.
    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.configured.load(Ordering::Acquire) && !self.suspended.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_flag_transitions() {
        let flag = MountFlag::new();
        assert!(!flag.is_mounted());
        flag.set_configured(true);
        assert!(flag.is_mounted());
        flag.set_configured(false);
        assert!(!flag.is_mounted());
    }

    #[test]
    fn test_resume_restores_mount() {
        let flag = MountFlag::new();
        flag.set_configured(true);
        flag.set_suspended(true);
        assert!(!flag.is_mounted());
        // Resume without re-enumeration: no new configured callback.
        flag.set_suspended(false);
        assert!(flag.is_mounted());
    }

    #[test]
    fn test_suspend_before_configure_stays_unmounted() {
        let flag = MountFlag::new();
        flag.set_suspended(true);
        flag.set_configured(true);
        assert!(!flag.is_mounted());
        flag.set_suspended(false);
        assert!(flag.is_mounted());
    }

    #[test]
    fn test_reset_clears_both_states() {
        let flag = MountFlag::new();
        flag.set_configured(true);
        flag.set_suspended(true);
        flag.reset();
        assert!(!flag.is_mounted());
        flag.set_configured(true);
        assert!(flag.is_mounted());
    }
}
