//! Voice translator — speak a sentence, hear it in another language.
//!
//! The crate wires a five-stage pipeline:
//!
//! ```text
//! microphone → recognition service → translation service
//!            → synthesis service → audio playback
//! ```
//!
//! [`pipeline::PipelineOrchestrator`] owns the state machine that sequences
//! the stages; everything else is a client or device wrapper it drives.

pub mod app;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod pipeline;
pub mod playback;
pub mod recognize;
pub mod synth;
pub mod translate;
