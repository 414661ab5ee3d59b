//! Input sources: identity, remote slot registry, and the source adapter.
//!
//! Each input channel gets its own [`SourceAdapter`], which owns the
//! channel's [`Decoder`] outright. Decoder state is never shared, so two
//! sources typing at once cannot corrupt each other's escape sequences.

use embassy_sync::blocking_mutex::raw::RawMutex;
use portable_atomic::{AtomicBool, Ordering};

use crate::config::MAX_REMOTE_SOURCES;
use crate::decoder::{Decoder, DECODER_CAPACITY};
use crate::dispatcher::{Dispatcher, Keystroke};
use crate::input::{ByteSource, InputError};
use crate::types::KeyEvent;

/// Bytes requested from a source per read.
pub const READ_CHUNK: usize = 64;

/// Identity of one input channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceId {
    /// The local serial line. Lives for the whole process.
    Serial,
    /// A remote shell session, by slot index.
    Remote(u8),
}

/// Error type for source lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// Every remote slot is in use.
    SlotsExhausted,
}

/// Fixed table of remote source slots.
///
/// A session claims a slot when its shell request succeeds and releases it
/// when the returned [`RemoteSlot`] is dropped.
#[derive(Debug)]
pub struct SourceSlots<const N: usize = MAX_REMOTE_SOURCES> {
    occupied: [AtomicBool; N],
}

impl<const N: usize> SourceSlots<N> {
    /// Create a table with every slot free.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            occupied: [const { AtomicBool::new(false) }; N],
        }
    }

    /// Claim the lowest free slot.
    pub fn claim(&self) -> Result<RemoteSlot<'_, N>, SourceError> {
        for (index, slot) in self.occupied.iter().enumerate() {
            // Slots past u8::MAX have no SourceId and are never handed out.
            let Ok(index) = u8::try_from(index) else {
                break;
            };
            if slot
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                info!("remote source {} attached", index);
                return Ok(RemoteSlot { slots: self, index });
            }
        }
        warn!("remote source rejected, all {} slots busy", N);
        Err(SourceError::SlotsExhausted)
    }

    /// Number of claimed slots.
    #[must_use]
    pub fn active(&self) -> usize {
        self.occupied
            .iter()
            .filter(|slot| slot.load(Ordering::Acquire))
            .count()
    }

    /// Check whether slot `index` is claimed.
    #[must_use]
    pub fn is_active(&self, index: u8) -> bool {
        self.occupied
            .get(usize::from(index))
            .is_some_and(|slot| slot.load(Ordering::Acquire))
    }

    fn release(&self, index: u8) {
        self.occupied[usize::from(index)].store(false, Ordering::Release);
        info!("remote source {} detached", index);
    }
}

impl<const N: usize> Default for SourceSlots<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A claimed remote slot; releases the slot on drop.
#[derive(Debug)]
pub struct RemoteSlot<'a, const N: usize = MAX_REMOTE_SOURCES> {
    slots: &'a SourceSlots<N>,
    index: u8,
}

impl<const N: usize> RemoteSlot<'_, N> {
    /// Source identity for this slot.
    #[must_use]
    pub fn id(&self) -> SourceId {
        SourceId::Remote(self.index)
    }
}

impl<const N: usize> Drop for RemoteSlot<'_, N> {
    fn drop(&mut self) {
        self.slots.release(self.index);
    }
}

/// Connects one byte source to the dispatcher.
///
/// Reads chunks from the source, decodes them with this source's own
/// decoder, and enqueues each resolved keystroke. Dropping the adapter
/// discards any partially received escape sequence.
pub struct SourceAdapter<I, const N: usize = DECODER_CAPACITY> {
    id: SourceId,
    input: I,
    decoder: Decoder<N>,
}

impl<I: ByteSource, const N: usize> SourceAdapter<I, N> {
    /// Create an adapter with an idle decoder.
    pub fn new(id: SourceId, input: I) -> Self {
        Self {
            id,
            input,
            decoder: Decoder::new(),
        }
    }

    /// Source identity.
    #[must_use]
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// This source's decoder.
    pub fn decoder(&self) -> &Decoder<N> {
        &self.decoder
    }

    /// Drop any partial escape sequence.
    pub fn reset(&mut self) {
        self.decoder.reset();
    }

    /// Decode a chunk into key events without touching the queue.
    ///
    /// NUL padding is skipped and literals with no key on the layout are
    /// dropped.
    pub fn translate<'a>(&'a mut self, chunk: &'a [u8]) -> impl Iterator<Item = KeyEvent> + 'a {
        let decoder = &mut self.decoder;
        chunk
            .iter()
            .copied()
            .filter(|&byte| byte != 0)
            .filter_map(move |byte| decoder.push(byte))
            .filter_map(|unit| {
                let event = unit.key_event();
                if event.is_none() {
                    trace!("no key for {:?}", unit);
                }
                event
            })
    }

    /// Run until the source fails or disconnects.
    ///
    /// Returns the error that ended the run. A clean close is reported as
    /// [`InputError::Disconnected`].
    pub async fn run<M: RawMutex, const Q: usize>(
        &mut self,
        dispatcher: &Dispatcher<M, Q>,
    ) -> InputError {
        loop {
            if let Err(e) = self.process_one(dispatcher).await {
                return e;
            }
        }
    }

    /// Read one chunk and enqueue the keystrokes it completes.
    ///
    /// Returns the number of keystrokes enqueued. A source that reports
    /// itself disconnected is not read.
    pub async fn process_one<M: RawMutex, const Q: usize>(
        &mut self,
        dispatcher: &Dispatcher<M, Q>,
    ) -> Result<usize, InputError> {
        if !self.input.is_connected() {
            return Err(InputError::Disconnected);
        }
        let mut buf = [0u8; READ_CHUNK];
        let len = self.input.read_chunk(&mut buf).await?;
        if len == 0 {
            return Err(InputError::Disconnected);
        }

        let id = self.id;
        let mut queued = 0;
        for event in self.translate(&buf[..len]) {
            match dispatcher.submit(Keystroke::new(id, event)).await {
                Ok(()) => queued += 1,
                Err(e) => debug!("{:?}: keystroke dropped: {:?}", id, e),
            }
        }
        Ok(queued)
    }

    /// Get a reference to the byte source.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Get a mutable reference to the byte source.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Tear down the adapter, keeping only the byte source.
    pub fn into_input(self) -> I {
        self.input
    }
}
