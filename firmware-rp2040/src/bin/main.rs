#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{UART1, USB};
use embassy_rp::uart::{BufferedUart, BufferedUartRx, Config as UartConfig};
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
#[cfg(feature = "announce")]
use embassy_time::Timer;
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;
use term_to_keyboard_rp2040::{
    configure_usb_hid, DispatchPolicy, Dispatcher, EmitterConfig, KeyboardRequestHandler,
    MountFlag, ReportEmitter, SourceAdapter, SourceId, UartByteSource, UsbKeyboard,
    UsbStateHandler,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::BufferedInterruptHandler<UART1>;
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Keystroke queue shared by every source and the emitter.
static DISPATCHER: Dispatcher<CriticalSectionRawMutex> = Dispatcher::new(DispatchPolicy::Block);

/// Set while the host has the keyboard configured and the bus is awake.
static MOUNTED: MountFlag = MountFlag::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// UART ring buffers, filled from the UART interrupt.
static UART_TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static UART_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();
static REQUEST_HANDLER: StaticCell<KeyboardRequestHandler> = StaticCell::new();
static STATE_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();

#[cfg(feature = "announce")]
const BANNER: &[u8] = b"term-to-keyboard ready\n";

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Term-to-Keyboard starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;

    let tx_buf = UART_TX_BUF.init([0; 16]);
    let rx_buf = UART_RX_BUF.init([0; 64]);

    #[cfg(not(feature = "uart-flow-control"))]
    let uart = BufferedUart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        tx_buf,
        rx_buf,
        uart_config,
    );
    #[cfg(feature = "uart-flow-control")]
    let uart = BufferedUart::new_with_rtscts(
        p.UART1,
        p.PIN_8,  // TX
        p.PIN_9,  // RX
        p.PIN_11, // RTS
        p.PIN_10, // CTS
        Irqs,
        tx_buf,
        rx_buf,
        uart_config,
    );
    let (_tx, rx) = uart.split();
    let serial = SourceAdapter::new(SourceId::Serial, UartByteSource::new(rx));

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Rust Keyboard");
    usb_config.product = Some("Term-to-Keyboard Bridge");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );
    builder.handler(STATE_HANDLER.init(UsbStateHandler::new(&MOUNTED)));

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let request_handler = REQUEST_HANDLER.init(KeyboardRequestHandler);
    let hid_writer = configure_usb_hid(&mut builder, hid_state, request_handler);

    // Build the USB device
    let usb_device = builder.build();

    let keyboard = UsbKeyboard::new(hid_writer, &MOUNTED);
    let emitter = ReportEmitter::new(keyboard, Delay, EmitterConfig::default());

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(serial_task(serial).unwrap());
    spawner.spawn(emitter_task(emitter).unwrap());
    #[cfg(feature = "announce")]
    spawner.spawn(announce_task().unwrap());

    info!("Term-to-Keyboard initialized, waiting for input...");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Serial task - decodes UART bytes into keystrokes.
#[embassy_executor::task]
async fn serial_task(mut serial: SourceAdapter<UartByteSource<BufferedUartRx>>) {
    loop {
        let e = serial.run(&DISPATCHER).await;
        warn!("Serial input error: {:?}", e);
        // A line error may have cut a sequence short.
        serial.reset();
    }
}

/// Emitter task - types queued keystrokes on the host.
#[embassy_executor::task]
async fn emitter_task(mut emitter: ReportEmitter<UsbKeyboard<'static>, Delay>) {
    emitter.run(&DISPATCHER).await
}

/// Announce task - types the banner once the host mounts the keyboard.
#[cfg(feature = "announce")]
#[embassy_executor::task]
async fn announce_task() {
    while !MOUNTED.is_mounted() {
        Timer::after_millis(100).await;
    }
    let typed = DISPATCHER.type_text(SourceId::Serial, BANNER).await;
    info!("Announced readiness ({} keystrokes)", typed);
}
