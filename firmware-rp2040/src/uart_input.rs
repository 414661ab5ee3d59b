//! UART-based byte source for terminal input.
//!
//! Passes raw bytes through untouched; decoding happens in the core's
//! [`SourceAdapter`](keyboard_core::SourceAdapter).
//!
//! # Pins
//!
//! Uses UART1 by default:
//! - GPIO 8: TX
//! - GPIO 9: RX
//! - GPIO 10: CTS (optional, with `uart-flow-control` feature)
//! - GPIO 11: RTS (optional, with `uart-flow-control` feature)

use embassy_rp::uart::Error as UartError;
use embedded_io_async::Read;
use keyboard_core::{ByteSource, InputError};

/// Convert UART errors to [`InputError`].
///
/// This is a helper function instead of a `From` impl to avoid orphan rule issues
/// (both `UartError` and `InputError` are defined in external crates).
#[inline]
fn uart_error_to_input_error(e: UartError) -> InputError {
    match e {
        UartError::Framing | UartError::Break => InputError::Framing,
        UartError::Overrun => InputError::Overrun,
        _ => InputError::Io,
    }
}

/// UART-based byte source.
///
/// Wraps an interrupt-buffered receiver such as
/// [`BufferedUartRx`](embassy_rp::uart::BufferedUartRx). Each read returns
/// whatever the ring buffer holds, from one byte up to the chunk size.
pub struct UartByteSource<R> {
    rx: R,
}

impl<R> UartByteSource<R> {
    /// Create a new UART byte source from the given UART receiver.
    #[must_use]
    pub fn new(rx: R) -> Self {
        Self { rx }
    }
}

impl<R: Read<Error = UartError>> ByteSource for UartByteSource<R> {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, InputError> {
        self.rx.read(buf).await.map_err(uart_error_to_input_error)
    }

    fn is_connected(&self) -> bool {
        // UART is always "connected" if we have the peripheral
        true
    }
}
