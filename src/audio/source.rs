//! The microphone abstraction injected into the capture-recognize worker.
//!
//! [`UtteranceSource`] is the seam between the worker and the audio
//! hardware: `open` claims the device, `capture` blocks until the endpoint
//! detector judges the utterance complete and returns it as 16 kHz mono
//! samples. Tests substitute a scripted source; production uses
//! [`MicUtteranceSource`].

use std::sync::mpsc;
use std::time::Duration;

use crate::audio::capture::{AudioCapture, AudioChunk, CaptureError};
use crate::audio::endpoint::{EndpointDetector, EndpointStatus};
use crate::audio::resample::{resample_to_16k, stereo_to_mono};
use crate::config::AudioConfig;

// ---------------------------------------------------------------------------
// UtteranceSource
// ---------------------------------------------------------------------------

/// One-utterance capture device.
///
/// Both methods block and are meant to run under
/// `tokio::task::spawn_blocking`. Implementors must be `Send` so a boxed
/// source can travel into the worker task; the non-`Send` hardware stream
/// itself only ever lives inside a single `capture` call.
pub trait UtteranceSource: Send {
    /// Claim the input device. Called exactly once, before `capture`.
    fn open(&mut self) -> Result<(), CaptureError>;

    /// Record until the utterance boundary (trailing silence after speech,
    /// or the configured ceiling) and return 16 kHz mono samples.
    ///
    /// The device is released before this returns, whatever the outcome.
    fn capture(&mut self) -> Result<Vec<f32>, CaptureError>;
}

// ---------------------------------------------------------------------------
// MicUtteranceSource
// ---------------------------------------------------------------------------

/// Production [`UtteranceSource`] over the default cpal input device.
pub struct MicUtteranceSource {
    audio: AudioConfig,
    device: Option<AudioCapture>,
}

impl MicUtteranceSource {
    /// How long we wait for the device to deliver a chunk before declaring
    /// the stream stalled.
    const CHUNK_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(audio: AudioConfig) -> Self {
        Self {
            audio,
            device: None,
        }
    }
}

impl UtteranceSource for MicUtteranceSource {
    fn open(&mut self) -> Result<(), CaptureError> {
        self.device = Some(AudioCapture::open()?);
        Ok(())
    }

    fn capture(&mut self) -> Result<Vec<f32>, CaptureError> {
        let device = self.device.take().ok_or(CaptureError::NotOpened)?;
        let channels = device.channels();
        let native_rate = device.sample_rate();

        let mut detector = EndpointDetector::new(
            self.audio.silence_threshold,
            native_rate,
            self.audio.silence_hold_secs,
            self.audio.max_utterance_secs,
        );

        let (tx, rx) = mpsc::channel::<AudioChunk>();
        let guard = device.start(tx)?;

        let mut mono: Vec<f32> = Vec::new();
        loop {
            let chunk = rx
                .recv_timeout(Self::CHUNK_TIMEOUT)
                .map_err(|_| CaptureError::Stalled)?;

            let chunk_mono = stereo_to_mono(&chunk.samples, channels);
            let status = detector.push(&chunk_mono);
            mono.extend_from_slice(&chunk_mono);

            if status == EndpointStatus::Complete {
                break;
            }
        }

        // Close the input device before the (potentially slow) resample.
        drop(guard);

        Ok(resample_to_16k(&mono, native_rate))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
