//! ReportEmitter: drains the dispatcher into the HID keyboard sink.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::config::EmitterConfig;
use crate::dispatcher::Dispatcher;
use crate::output::{KeyboardSink, OutputError};
use crate::report::KeyboardReport;
use crate::types::KeyEvent;

/// Turns keystrokes into timed press/release report pairs.
///
/// For each keystroke the emitter sends a key-down report, holds it for
/// [`EmitterConfig::press_hold_ms`], sends the all-released report, then
/// waits [`EmitterConfig::release_gap_ms`]. The emitter is the only
/// consumer of the dispatcher, so one pair always completes before the
/// next begins.
///
/// # Error Handling
///
/// Keystrokes that arrive while the sink is not ready are dropped with
/// [`OutputError::NotReady`], not retried. Sink write errors are logged
/// and the emitter moves on.
pub struct ReportEmitter<O, D> {
    sink: O,
    delay: D,
    config: EmitterConfig,
}

impl<O: KeyboardSink, D: DelayNs> ReportEmitter<O, D> {
    /// Create an emitter over a sink and a delay provider.
    pub fn new(sink: O, delay: D, config: EmitterConfig) -> Self {
        Self {
            sink,
            delay,
            config,
        }
    }

    /// Run the emitter, draining the dispatcher indefinitely.
    ///
    /// This method never returns under normal operation.
    pub async fn run<M: RawMutex, const N: usize>(&mut self, dispatcher: &Dispatcher<M, N>) -> ! {
        loop {
            let _ = self.process_one(dispatcher).await;
        }
    }

    /// Wait for one keystroke and emit it.
    ///
    /// Returns the result of the operation for testing purposes.
    pub async fn process_one<M: RawMutex, const N: usize>(
        &mut self,
        dispatcher: &Dispatcher<M, N>,
    ) -> Result<(), OutputError> {
        let keystroke = dispatcher.receive().await;
        trace!("{:?} -> {:?}", keystroke.source, keystroke.event);
        self.emit(keystroke.event).await.inspect_err(|e| match e {
            OutputError::NotReady => debug!("sink not ready, {:?} dropped", keystroke.event),
            OutputError::Io => warn!("{:?}: report not sent: {:?}", keystroke.source, e),
        })
    }

    /// Emit one keystroke as a press/hold/release/gap sequence.
    ///
    /// Returns [`OutputError::NotReady`] without touching the sink or the
    /// delay if the host is not mounted.
    pub async fn emit(&mut self, event: KeyEvent) -> Result<(), OutputError> {
        if !self.sink.is_ready() {
            return Err(OutputError::NotReady);
        }

        let pressed = self.sink.send_report(&KeyboardReport::pressed(event)).await;
        self.delay.delay_ms(self.config.press_hold_ms).await;
        // Release even if the press failed so no key is left held.
        let released = self.sink.send_report(&KeyboardReport::released()).await;
        self.delay.delay_ms(self.config.release_gap_ms).await;

        pressed.and(released)
    }

    /// Timing in use.
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Get a reference to the keyboard sink.
    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// Get a mutable reference to the keyboard sink.
    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.sink
    }

    /// Decompose the emitter into its sink and delay provider.
    pub fn into_parts(self) -> (O, D) {
        (self.sink, self.delay)
    }
}
