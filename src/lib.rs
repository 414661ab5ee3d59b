//! Platform-agnostic terminal-input decoding and HID keyboard emission.
//!
//! This crate turns raw byte streams from terminal-like sources (a serial
//! line, remote shell sessions) into USB HID keyboard reports. It has no
//! platform-specific dependencies and runs both in embedded `no_std`
//! firmware and on the host for testing.
//!
//! # Overview
//!
//! ```text
//! bytes -> SourceAdapter -> Decoder -> KeyEvent -> Dispatcher -> ReportEmitter -> HID reports
//! ```
//!
//! - [`keymap`]: character to keycode table ([`keymap::lookup`])
//! - [`decoder`]: per-source escape-sequence state machine ([`Decoder`])
//! - [`source`]: byte source adapter and remote slot registry ([`SourceAdapter`], [`SourceSlots`])
//! - [`dispatcher`]: the single bounded keystroke queue ([`Dispatcher`])
//! - [`emitter`]: press/hold/release report timing ([`ReportEmitter`])
//! - [`input`] / [`output`]: traits at the hardware seams ([`ByteSource`], [`KeyboardSink`])
//!
//! # Concurrency
//!
//! Run one task per source and one emitter task. Sources only share the
//! dispatcher; each owns its decoder. Decoding completes before a
//! keystroke is enqueued, so sources interleave at keystroke granularity
//! and never inside an escape sequence.
//!
//! # Example
//!
//! ```rust
//! use keyboard_core::{Decoder, Keycode, KeyEvent};
//!
//! let mut decoder: Decoder = Decoder::new();
//! let events: Vec<KeyEvent> = decoder
//!     .decode(b"A\x1b[3~")
//!     .filter_map(|unit| unit.key_event())
//!     .collect();
//! assert_eq!(events, [KeyEvent::shifted(Keycode::A), KeyEvent::plain(Keycode::DELETE)]);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through defmt and derive `defmt::Format` (for embedded logging)
//! - **`log`**: Log through the `log` crate
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod decoder;
pub mod dispatcher;
pub mod emitter;
pub mod input;
pub mod keymap;
pub mod output;
pub mod report;
pub mod source;
pub mod types;

// Re-export main types at crate root
pub use config::{DispatchPolicy, EmitterConfig, DISPATCH_DEPTH, MAX_REMOTE_SOURCES};
pub use decoder::{Decoded, Decoder, DecoderState, NavKey, DECODER_CAPACITY};
pub use dispatcher::{DispatchError, Dispatcher, Keystroke};
pub use emitter::ReportEmitter;
pub use input::{ByteSource, InputError};
pub use output::{KeyboardSink, MountFlag, OutputError};
pub use report::KeyboardReport;
pub use source::{RemoteSlot, SourceAdapter, SourceError, SourceId, SourceSlots};
pub use types::{KeyEvent, Keycode, Modifiers};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::tests::{recording_emitter, Step};
    use crate::source::tests::ScriptedInput;
    use embassy_futures::block_on;
    use embassy_futures::join::{join, join3};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::string::String;
    use std::vec::Vec;

    /// Deterministic xorshift generator for reproducible fuzz input.
    struct XorShift(u32);

    impl XorShift {
        fn next(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }

        fn below(&mut self, n: usize) -> usize {
            self.next() as usize % n
        }
    }

    /// Terminal-ish noise: text, valid and broken sequences, stray ESCs.
    fn fuzz_text(rng: &mut XorShift, len: usize) -> String {
        const PIECES: &[&str] = &[
            "a", "Z", "7", " ", "\r", "\t", "\x7f", "~", "[", "?", "\0", "\x1b", "\x1b[", "\x1b[A",
            "\x1b[D", "\x1b[H", "\x1b[3~", "\x1b[6~", "\x1b[15~", "\x1b[1;5C", "\x1b[99999999",
            "\x1bO",
        ];
        (0..len).map(|_| PIECES[rng.below(PIECES.len())]).collect()
    }

    /// Split text into chunks of 1..=5 bytes at arbitrary boundaries.
    fn random_chunks(rng: &mut XorShift, text: &str) -> Vec<String> {
        let bytes = text.as_bytes();
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < bytes.len() {
            let end = (start + 1 + rng.below(5)).min(bytes.len());
            // Every piece is ASCII, so any split is valid UTF-8.
            chunks.push(String::from_utf8(bytes[start..end].to_vec()).unwrap());
            start = end;
        }
        chunks
    }

    fn replay(text: &str) -> Vec<KeyEvent> {
        let mut adapter: SourceAdapter<_> =
            SourceAdapter::new(SourceId::Serial, ScriptedInput::new(&[]));
        adapter.translate(text.as_bytes()).collect()
    }

    fn scripted(chunks: &[String]) -> ScriptedInput {
        let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        ScriptedInput::new(&refs)
    }

    #[test]
    fn test_arrow_up_end_to_end() {
        let chunkings: [&[&str]; 4] = [
            &["\x1b[A"],
            &["\x1b", "[A"],
            &["\x1b[", "A"],
            &["\x1b", "[", "A"],
        ];
        for chunks in chunkings {
            let dispatcher = Dispatcher::<NoopRawMutex, 4>::new(DispatchPolicy::Block);
            let (mut emitter, trace) = recording_emitter(EmitterConfig::default());
            let mut adapter: SourceAdapter<_> =
                SourceAdapter::new(SourceId::Serial, ScriptedInput::new(chunks));

            block_on(async {
                adapter.run(&dispatcher).await;
                assert_eq!(dispatcher.len(), 1);
                emitter.process_one(&dispatcher).await.unwrap();
            });

            let reports: Vec<KeyboardReport> = trace
                .borrow()
                .iter()
                .filter_map(|step| match step {
                    Step::Report(r) => Some(*r),
                    Step::Delay(_) => None,
                })
                .collect();
            assert_eq!(
                reports,
                [
                    KeyboardReport::pressed(KeyEvent::plain(Keycode::ARROW_UP)),
                    KeyboardReport::released(),
                ]
            );
        }
    }

    #[test]
    fn test_two_sources_interleave_whole_keystrokes() {
        let dispatcher = Dispatcher::<NoopRawMutex, 2>::new(DispatchPolicy::Block);
        let slots = SourceSlots::<3>::new();
        let first = slots.claim().unwrap();
        let second = slots.claim().unwrap();

        // Both sources split every sequence across reads.
        let mut a: SourceAdapter<_> = SourceAdapter::new(
            first.id(),
            ScriptedInput::new(&["h", "\x1b", "[", "A", "i", "\x1b[", "3", "~"]),
        );
        let mut b: SourceAdapter<_> = SourceAdapter::new(
            second.id(),
            ScriptedInput::new(&["\x1b", "[B", "4", "\x1b[5", "~", "2"]),
        );

        let mut received = Vec::new();
        let expected = replay("h\x1b[Ai\x1b[3~").len() + replay("\x1b[B4\x1b[5~2").len();
        block_on(join3(a.run(&dispatcher), b.run(&dispatcher), async {
            while received.len() < expected {
                received.push(dispatcher.receive().await);
            }
        }));

        let from = |id: SourceId| -> Vec<KeyEvent> {
            received
                .iter()
                .filter(|k| k.source == id)
                .map(|k| k.event)
                .collect()
        };
        assert_eq!(
            from(SourceId::Remote(0)),
            [
                KeyEvent::plain(Keycode(0x0B)),
                KeyEvent::plain(Keycode::ARROW_UP),
                KeyEvent::plain(Keycode(0x0C)),
                KeyEvent::plain(Keycode::DELETE),
            ]
        );
        assert_eq!(
            from(SourceId::Remote(1)),
            [
                KeyEvent::plain(Keycode::ARROW_DOWN),
                KeyEvent::plain(Keycode(0x21)),
                KeyEvent::plain(Keycode::PAGE_UP),
                KeyEvent::plain(Keycode(0x1F)),
            ]
        );
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_fuzzed_sources_match_single_source_replay() {
        let mut rng = XorShift(0x2545_F491);
        for _ in 0..50 {
            let text_a = fuzz_text(&mut rng, 40);
            let text_b = fuzz_text(&mut rng, 40);
            let expected_a = replay(&text_a);
            let expected_b = replay(&text_b);

            let dispatcher = Dispatcher::<NoopRawMutex, 3>::new(DispatchPolicy::Block);
            let mut a: SourceAdapter<_> = SourceAdapter::new(
                SourceId::Remote(0),
                scripted(&random_chunks(&mut rng, &text_a)),
            );
            let mut b: SourceAdapter<_> =
                SourceAdapter::new(SourceId::Serial, scripted(&random_chunks(&mut rng, &text_b)));

            let total = expected_a.len() + expected_b.len();
            let mut received = Vec::new();
            block_on(join(join(a.run(&dispatcher), b.run(&dispatcher)), async {
                while received.len() < total {
                    received.push(dispatcher.receive().await);
                }
            }));

            let got_a: Vec<KeyEvent> = received
                .iter()
                .filter(|k| k.source == SourceId::Remote(0))
                .map(|k| k.event)
                .collect();
            let got_b: Vec<KeyEvent> = received
                .iter()
                .filter(|k| k.source == SourceId::Serial)
                .map(|k| k.event)
                .collect();
            assert_eq!(got_a, expected_a, "source A input {:?}", text_a);
            assert_eq!(got_b, expected_b, "source B input {:?}", text_b);
        }
    }

    #[test]
    fn test_emitter_serializes_concurrent_sources() {
        let dispatcher = Dispatcher::<NoopRawMutex, 2>::new(DispatchPolicy::Block);
        let (mut emitter, trace) = recording_emitter(EmitterConfig::default());
        let mut a: SourceAdapter<_> =
            SourceAdapter::new(SourceId::Serial, ScriptedInput::new(&["ab", "c"]));
        let mut b: SourceAdapter<_> =
            SourceAdapter::new(SourceId::Remote(0), ScriptedInput::new(&["\x1b[", "C", "1"]));

        block_on(join3(a.run(&dispatcher), b.run(&dispatcher), async {
            for _ in 0..5 {
                assert_eq!(emitter.process_one(&dispatcher).await, Ok(()));
            }
        }));

        // Every press is immediately followed by hold, release and gap.
        let trace = trace.borrow();
        assert_eq!(trace.len(), 5 * 4);
        for pair in trace.chunks(4) {
            assert!(matches!(pair[0], Step::Report(r) if !r.is_released()));
            assert_eq!(pair[1], Step::Delay(50));
            assert_eq!(pair[2], Step::Report(KeyboardReport::released()));
            assert_eq!(pair[3], Step::Delay(10));
        }
    }
}
