//! Pipeline stage tracking and the state the UI renders from.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// The stage the translation cycle is currently in.
///
/// Exactly one cycle runs at a time; every non-`Idle` state refuses new
/// start requests. `Playing` is nominal: playback is handed off
/// fire-and-forget, the orchestrator marks the stage while the hand-off
/// completes and then returns to `Idle` without waiting for the audio to
/// finish sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Recording,
    Translating,
    Synthesizing,
    Playing,
}

impl PipelineState {
    /// Any non-idle stage means a cycle is in flight.
    pub fn is_busy(&self) -> bool {
        *self != PipelineState::Idle
    }

    /// Short label for the UI.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "ready",
            PipelineState::Recording => "recording…",
            PipelineState::Translating => "translating…",
            PipelineState::Synthesizing => "synthesizing…",
            PipelineState::Playing => "playing…",
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingSession
// ---------------------------------------------------------------------------

/// Per-cycle scratch state, created at start and discarded at every return
/// to idle. Fields fill in as the stages complete.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    /// Target language locked in when the cycle started.
    pub language_code: String,
    pub recognized: Option<String>,
    pub translated: Option<String>,
    pub artifact: Option<PathBuf>,
}

impl RecordingSession {
    pub fn new(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            recognized: None,
            translated: None,
            artifact: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// State shared between the orchestrator (writer) and the UI (reader).
#[derive(Debug, Default)]
pub struct AppState {
    pub pipeline: PipelineState,
    /// Most recent transcript, kept on screen across cycles.
    pub recognized_text: Option<String>,
    /// Most recent translation, kept on screen across cycles.
    pub translated_text: Option<String>,
    /// Whether a completed translation exists to download.
    pub can_download: bool,
}

pub type SharedState = Arc<Mutex<AppState>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(AppState::default()))
}
