//! The one-shot capture-and-recognize worker.
//!
//! [`WorkerHandle`] owns everything one recording attempt needs: an unused
//! [`UtteranceSource`], the recognizer, a status reporter and the outcome
//! channel back to the orchestrator. [`WorkerHandle::spawn`] consumes the
//! handle, so "a handle runs at most once" is enforced by move semantics —
//! the orchestrator arms a fresh handle for every cycle instead of ever
//! restarting a finished one.
//!
//! One run emits, in order, the status strings "microphone accessed",
//! "audio recorded", "recognizing…" and an outcome message, then delivers
//! exactly one [`WorkerOutcome`].

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::audio::{encode_wav_mono16, UtteranceSource, RECOGNITION_RATE};
use crate::pipeline::StatusReporter;
use crate::recognize::client::{RecognizeOutcome, Recognizer};

// ---------------------------------------------------------------------------
// WorkerOutcome
// ---------------------------------------------------------------------------

/// The four mutually exclusive results of one worker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Non-empty transcript; the pipeline continues with translation.
    Recognized(String),
    /// The service understood no speech; the cycle ends.
    Unintelligible,
    /// Network/service failure during transcription.
    ServiceError(String),
    /// Device/access failure (e.g. microphone unavailable).
    Failure(String),
}

// ---------------------------------------------------------------------------
// WorkerHandle
// ---------------------------------------------------------------------------

/// An armed, unused capture-and-recognize run.
pub struct WorkerHandle {
    source: Box<dyn UtteranceSource>,
    recognizer: Arc<dyn Recognizer>,
    status: StatusReporter,
    outcome_tx: mpsc::Sender<WorkerOutcome>,
}

impl WorkerHandle {
    pub fn new(
        source: Box<dyn UtteranceSource>,
        recognizer: Arc<dyn Recognizer>,
        status: StatusReporter,
        outcome_tx: mpsc::Sender<WorkerOutcome>,
    ) -> Self {
        Self {
            source,
            recognizer,
            status,
            outcome_tx,
        }
    }

    /// Run the capture-and-recognize attempt on a background task.
    ///
    /// Consumes the handle; a finished worker can never be restarted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        let Self {
            source,
            recognizer,
            status,
            outcome_tx,
        } = self;

        // ── 1. Capture (blocking → thread pool) ──────────────────────────
        let capture_status = status.clone();
        let captured = tokio::task::spawn_blocking(move || {
            let mut source = source;
            source.open()?;
            capture_status.report("microphone accessed");
            let samples = source.capture()?;
            capture_status.report("audio recorded");
            Ok::<Vec<f32>, crate::audio::CaptureError>(samples)
        })
        .await;

        let samples = match captured {
            Ok(Ok(samples)) => samples,
            Ok(Err(e)) => {
                status.report(format!("microphone error: {e}"));
                let _ = outcome_tx.send(WorkerOutcome::Failure(e.to_string())).await;
                return;
            }
            Err(e) => {
                status.report(format!("recording task failed: {e}"));
                let _ = outcome_tx.send(WorkerOutcome::Failure(e.to_string())).await;
                return;
            }
        };

        // ── 2. Encode for upload ─────────────────────────────────────────
        let wav = match encode_wav_mono16(&samples, RECOGNITION_RATE) {
            Ok(wav) => wav,
            Err(e) => {
                status.report(format!("audio encoding error: {e}"));
                let _ = outcome_tx.send(WorkerOutcome::Failure(e.to_string())).await;
                return;
            }
        };

        // ── 3. Recognition request ───────────────────────────────────────
        status.report("recognizing…");

        let outcome = match recognizer.recognize(&wav).await {
            Ok(RecognizeOutcome::Recognized(text)) => {
                status.report(format!("recognized: \"{text}\""));
                WorkerOutcome::Recognized(text)
            }
            Ok(RecognizeOutcome::Unintelligible) => {
                status.report("could not understand the audio");
                WorkerOutcome::Unintelligible
            }
            Err(e) => {
                status.report(format!("recognition service error: {e}"));
                WorkerOutcome::ServiceError(e.to_string())
            }
        };

        let _ = outcome_tx.send(outcome).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
