//! Speech recognition — remote client and the one-shot capture worker.
//!
//! # Architecture
//!
//! ```text
//! WorkerHandle::spawn()           ← armed by the orchestrator, runs once
//!   ├─ UtteranceSource (blocking) → 16 kHz mono samples
//!   ├─ encode_wav_mono16          → WAV bytes
//!   └─ Recognizer::recognize      → transcript / unintelligible / error
//!         │
//!         └─▶ exactly one WorkerOutcome back to the orchestrator
//! ```
//!
//! [`Recognizer`] is the network seam; [`ApiRecognizer`] speaks the
//! whisper.cpp server protocol. [`WorkerHandle`] is single-use by
//! construction — `spawn(self)` consumes it.

pub mod client;
pub mod worker;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use client::{ApiRecognizer, RecognizeError, RecognizeOutcome, Recognizer};
pub use worker::{WorkerHandle, WorkerOutcome};

// test-only re-export so other test modules can script recognition results
// without reaching into `client` directly.
#[cfg(test)]
pub use client::MockRecognizer;
