//! Byte source trait and error types.

use core::future::Future;

/// Error type for byte source operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// UART/transport I/O error.
    Io,
    /// UART framing or break error.
    Framing,
    /// Receive FIFO overrun; bytes were lost.
    Overrun,
    /// Channel closed by the peer.
    Disconnected,
}

/// Async trait for terminal-like byte sources.
///
/// Abstracts one input channel (a serial line, one remote shell session)
/// so the source adapter can decode any of them the same way.
///
/// # Chunking
///
/// A read may return any number of bytes. Escape sequences are routinely
/// split across reads; the decoder, not the source, reassembles them.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ByteSource {
    /// Wait for the next chunk of bytes and copy it into `buf`.
    ///
    /// Returns the number of bytes written (at least one), `Ok(0)` when the
    /// channel was closed cleanly, or an error.
    fn read_chunk(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, InputError>>;

    /// Check if the source is connected.
    ///
    /// Checked before every read; once this returns `false` the adapter
    /// stops reading and ends its run.
    fn is_connected(&self) -> bool;
}
