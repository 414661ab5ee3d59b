//! Serial terminal to USB HID keyboard bridge for RP2040.
//!
//! This crate provides the embedded side of the keyboard bridge: a UART
//! byte source and a USB HID keyboard sink for [`keyboard_core`].
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives raw terminal bytes over UART (115200 baud, 8N1)
//! 2. Decodes them into keystrokes, including arrow and editing keys
//! 3. Types each keystroke on the host as a USB HID boot keyboard
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Serial transmit |
//! | UART1 RX | 9    | Serial receive (terminal input) |
//! | UART1 CTS| 10   | Clear to send (`uart-flow-control` only) |
//! | UART1 RTS| 11   | Request to send (`uart-flow-control` only) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with three concurrent tasks:
//!
//! - **USB Task**: Manages the USB device stack and the mount flag
//! - **Serial Task**: Reads UART bytes and feeds the dispatcher through a
//!   [`SourceAdapter`](keyboard_core::SourceAdapter)
//! - **Emitter Task**: Drains the dispatcher and sends press/release reports
//!
//! Tasks share a single static [`Dispatcher`](keyboard_core::Dispatcher).
//! Unlike a "latest value wins" signal, every keystroke is queued and typed
//! in order.
//!
//! # Modules
//!
//! - [`uart_input`]: UART byte source ([`UartByteSource`])
//! - [`usb_output`]: USB HID keyboard sink ([`UsbKeyboard`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`uart-flow-control`**: Enable hardware flow control (CTS/RTS on GPIO 10/11)
//! - **`announce`** (default): Type a ready banner once the host mounts the keyboard

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they each provide a panic handler");

// Re-export core types for convenience
pub use keyboard_core::{
    ByteSource, DispatchPolicy, Dispatcher, EmitterConfig, InputError, KeyboardReport,
    KeyboardSink, MountFlag, OutputError, ReportEmitter, SourceAdapter, SourceId,
};

pub mod uart_input;
pub mod usb_output;

pub use uart_input::UartByteSource;
pub use usb_output::{configure_usb_hid, KeyboardRequestHandler, UsbKeyboard, UsbStateHandler};
