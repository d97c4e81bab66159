//! Utterance endpoint detection.
//!
//! [`EndpointDetector`] decides when one spoken utterance is finished so the
//! capture loop knows when to stop listening. Audio is classified in 30 ms
//! RMS frames (the same energy measure the silence trimmers in this family
//! of tools use):
//!
//! * before any speech, everything is leading silence — keep listening;
//! * once a voice frame has been heard, a configurable run of trailing
//!   silent frames completes the utterance;
//! * a hard frame ceiling completes the utterance unconditionally, so a
//!   noisy room can never hold the recording open forever.

// ---------------------------------------------------------------------------
// EndpointStatus
// ---------------------------------------------------------------------------

/// Verdict after feeding samples to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointStatus {
    /// The utterance is still in progress — keep capturing.
    Continue,
    /// The utterance boundary was reached (trailing silence or ceiling).
    Complete,
}

// ---------------------------------------------------------------------------
// EndpointDetector
// ---------------------------------------------------------------------------

/// Streaming silence-based endpoint detector over mono audio at any rate.
///
/// # Example
///
/// ```rust
/// use voice_translator::audio::{EndpointDetector, EndpointStatus};
///
/// // 16 kHz, quiet-room threshold, 0.09 s of trailing silence, 30 s ceiling
/// let mut det = EndpointDetector::new(0.01, 16_000, 0.09, 30.0);
///
/// let speech = vec![0.5_f32; 1_600];
/// assert_eq!(det.push(&speech), EndpointStatus::Continue);
///
/// let silence = vec![0.0_f32; 1_600]; // 0.1 s — past the hold window
/// assert_eq!(det.push(&silence), EndpointStatus::Complete);
/// ```
pub struct EndpointDetector {
    /// RMS amplitude threshold; frames below it count as silence.
    rms_threshold: f32,
    /// Frame size in samples (30 ms at the stream's rate).
    frame_size: usize,
    /// Trailing silent frames required after speech to complete.
    hold_frames: usize,
    /// Unconditional ceiling in frames.
    max_frames: usize,

    heard_speech: bool,
    silent_run: usize,
    frames_seen: usize,
    /// Carry-over for samples that do not fill a whole frame yet.
    pending: Vec<f32>,
}

impl EndpointDetector {
    /// Frame length used for RMS classification: 30 ms.
    const FRAME_SECS: f32 = 0.030;

    /// Create a detector for a mono stream at `sample_rate` Hz.
    ///
    /// * `rms_threshold` — silence threshold in `[0.0, 1.0]`; `0.01` suits a
    ///   quiet room.
    /// * `hold_secs` — trailing silence that ends the utterance.
    /// * `max_secs` — hard ceiling on utterance length.
    pub fn new(rms_threshold: f32, sample_rate: u32, hold_secs: f32, max_secs: f32) -> Self {
        let frame_size = ((sample_rate as f32 * Self::FRAME_SECS) as usize).max(1);
        let frame_secs = frame_size as f32 / sample_rate as f32;
        Self {
            rms_threshold,
            frame_size,
            hold_frames: ((hold_secs / frame_secs).ceil() as usize).max(1),
            max_frames: ((max_secs / frame_secs).ceil() as usize).max(1),
            heard_speech: false,
            silent_run: 0,
            frames_seen: 0,
            pending: Vec::new(),
        }
    }

    /// Feed a chunk of mono samples; returns the verdict after consuming all
    /// whole frames in it. Once `Complete` has been returned the detector
    /// stays complete.
    pub fn push(&mut self, samples: &[f32]) -> EndpointStatus {
        if self.is_complete() {
            return EndpointStatus::Complete;
        }

        self.pending.extend_from_slice(samples);

        while self.pending.len() >= self.frame_size {
            let frame: Vec<f32> = self.pending.drain(..self.frame_size).collect();
            self.frames_seen += 1;

            if Self::rms(&frame) > self.rms_threshold {
                self.heard_speech = true;
                self.silent_run = 0;
            } else {
                self.silent_run += 1;
            }

            if self.is_complete() {
                return EndpointStatus::Complete;
            }
        }

        if self.is_complete() {
            EndpointStatus::Complete
        } else {
            EndpointStatus::Continue
        }
    }

    /// `true` once the utterance boundary has been reached.
    pub fn is_complete(&self) -> bool {
        (self.heard_speech && self.silent_run >= self.hold_frames)
            || self.frames_seen >= self.max_frames
    }

    /// `true` once at least one voice frame has been heard.
    pub fn heard_speech(&self) -> bool {
        self.heard_speech
    }

    fn rms(frame: &[f32]) -> f32 {
        if frame.is_empty() {
            return 0.0;
        }
        let mean_sq: f32 = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
        mean_sq.sqrt()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
