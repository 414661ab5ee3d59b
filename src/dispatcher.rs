//! Dispatcher: the single queue between source adapters and the emitter.
//!
//! Every keystroke from every source passes through one bounded FIFO with
//! a single consumer. Keystrokes leave in the order they were enqueued, and
//! since a source only enqueues fully decoded keystrokes, two sources can
//! interleave only between whole keystrokes.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicU32, Ordering};

use crate::config::{DispatchPolicy, DISPATCH_DEPTH};
use crate::decoder::Decoder;
use crate::source::SourceId;
use crate::types::KeyEvent;

/// A keystroke tagged with the source that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keystroke {
    pub source: SourceId,
    pub event: KeyEvent,
}

impl Keystroke {
    #[must_use]
    pub const fn new(source: SourceId, event: KeyEvent) -> Self {
        Self { source, event }
    }
}

/// Error type for dispatcher operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Queue full under [`DispatchPolicy::DropNewest`]; the keystroke was dropped.
    Full,
}

/// Multi-producer, single-consumer keystroke queue.
///
/// Designed to live in a `static` shared by all tasks:
///
/// ```
/// use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
/// use keyboard_core::{DispatchPolicy, Dispatcher};
///
/// static DISPATCHER: Dispatcher<CriticalSectionRawMutex> = Dispatcher::new(DispatchPolicy::Block);
/// assert_eq!(DISPATCHER.policy(), DispatchPolicy::Block);
/// ```
pub struct Dispatcher<M: RawMutex, const N: usize = DISPATCH_DEPTH> {
    queue: Channel<M, Keystroke, N>,
    policy: DispatchPolicy,
    dropped: AtomicU32,
}

impl<M: RawMutex, const N: usize> Dispatcher<M, N> {
    /// Create an empty dispatcher with the given full-queue policy.
    #[must_use]
    pub const fn new(policy: DispatchPolicy) -> Self {
        Self {
            queue: Channel::new(),
            policy,
            dropped: AtomicU32::new(0),
        }
    }

    /// Full-queue policy.
    #[must_use]
    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Enqueue a keystroke.
    ///
    /// Under [`DispatchPolicy::Block`] this waits for room and always
    /// succeeds. Under [`DispatchPolicy::DropNewest`] a full queue drops the
    /// keystroke and returns [`DispatchError::Full`].
    pub async fn submit(&self, keystroke: Keystroke) -> Result<(), DispatchError> {
        match self.policy {
            DispatchPolicy::Block => {
                self.queue.send(keystroke).await;
                Ok(())
            }
            DispatchPolicy::DropNewest => self.queue.try_send(keystroke).map_err(|_| {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                DispatchError::Full
            }),
        }
    }

    /// Wait for the next keystroke.
    pub async fn receive(&self) -> Keystroke {
        self.queue.receive().await
    }

    /// Take the next keystroke if one is queued.
    pub fn try_receive(&self) -> Option<Keystroke> {
        self.queue.try_receive().ok()
    }

    /// Number of queued keystrokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Keystrokes dropped because the queue was full.
    #[must_use]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Type a fixed text through the queue as if `source` had sent it.
    ///
    /// The text is decoded with a fresh decoder, so it may contain escape
    /// sequences. Returns the number of keystrokes enqueued.
    pub async fn type_text(&self, source: SourceId, text: &[u8]) -> usize {
        let mut decoder: Decoder = Decoder::new();
        let mut queued = 0;
        for unit in decoder.decode(text) {
            let Some(event) = unit.key_event() else {
                continue;
            };
            if self.submit(Keystroke::new(source, event)).await.is_ok() {
                queued += 1;
            }
        }
        queued
    }
}
