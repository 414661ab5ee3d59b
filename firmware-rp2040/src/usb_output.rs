//! USB HID keyboard output implementation.

use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{HidBootProtocol, HidSubclass, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Handler};
use keyboard_core::{KeyboardReport, KeyboardSink, MountFlag, OutputError};
use usbd_hid::descriptor::{KeyboardReport as KeyboardDescriptor, SerializedDescriptor};

/// USB HID keyboard sink.
///
/// Wraps an embassy-usb HID writer. Readiness follows the shared
/// [`MountFlag`], which [`UsbStateHandler`] updates from the USB stack.
pub struct UsbKeyboard<'d> {
    writer: HidWriter<'d, Driver<'d, USB>, { KeyboardReport::SIZE }>,
    mounted: &'d MountFlag,
}

impl<'d> UsbKeyboard<'d> {
    /// Create a new keyboard sink from the given HID writer.
    pub fn new(
        writer: HidWriter<'d, Driver<'d, USB>, { KeyboardReport::SIZE }>,
        mounted: &'d MountFlag,
    ) -> Self {
        Self { writer, mounted }
    }
}

impl KeyboardSink for UsbKeyboard<'_> {
    async fn send_report(&mut self, report: &KeyboardReport) -> Result<(), OutputError> {
        self.writer
            .write(&report.as_bytes())
            .await
            .map_err(|_| OutputError::Io)
    }

    fn is_ready(&self) -> bool {
        self.mounted.is_mounted()
    }
}

/// Tracks whether the host has configured the device.
pub struct UsbStateHandler {
    mounted: &'static MountFlag,
}

impl UsbStateHandler {
    #[must_use]
    pub const fn new(mounted: &'static MountFlag) -> Self {
        Self { mounted }
    }
}

impl Handler for UsbStateHandler {
    fn reset(&mut self) {
        self.mounted.reset();
    }

    fn configured(&mut self, configured: bool) {
        defmt::info!("USB {}", if configured { "mounted" } else { "unmounted" });
        self.mounted.set_configured(configured);
    }

    fn suspended(&mut self, suspended: bool) {
        defmt::debug!("USB {}", if suspended { "suspended" } else { "resumed" });
        self.mounted.set_suspended(suspended);
    }
}

/// HID request handler (handles SET_REPORT, etc.).
///
/// Host LED output reports are accepted and ignored.
pub struct KeyboardRequestHandler;

impl RequestHandler for KeyboardRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the USB HID boot keyboard class in the USB builder.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, Driver<'d, USB>>,
    state: &'d mut State<'d>,
    request_handler: &'d mut KeyboardRequestHandler,
) -> HidWriter<'d, Driver<'d, USB>, { KeyboardReport::SIZE }> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: KeyboardDescriptor::desc(),
        request_handler: Some(request_handler),
        poll_ms: 10,
        max_packet_size: 8,
        hid_subclass: HidSubclass::Boot,
        hid_boot_protocol: HidBootProtocol::Keyboard,
    };

    HidWriter::new(builder, state, config)
}
