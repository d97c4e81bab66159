//! Audio front-end — microphone capture → endpoint detection → resampling
//! → WAV encoding.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → stereo_to_mono
//!           → EndpointDetector (utterance boundary) → resample_to_16k
//!           → encode_wav_mono16 → recognition upload
//! ```
//!
//! [`MicUtteranceSource`] bundles the whole chain behind the
//! [`UtteranceSource`] trait the capture worker consumes.

pub mod capture;
pub mod endpoint;
pub mod resample;
pub mod source;
pub mod wav;

pub use capture::{AudioCapture, AudioChunk, CaptureError, InputStreamGuard};
pub use endpoint::{EndpointDetector, EndpointStatus};
pub use resample::{resample_to_16k, stereo_to_mono, RECOGNITION_RATE};
pub use source::{MicUtteranceSource, UtteranceSource};
pub use wav::{encode_wav_mono16, WavError};
