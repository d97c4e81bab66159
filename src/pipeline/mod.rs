//! Cycle orchestration — state tracking, status feed and the event loop
//! that sequences capture, translation, synthesis and playback.

pub mod runner;
pub mod state;
pub mod status;

pub use runner::{PipelineCommand, PipelineOrchestrator, SourceFactory};
pub use state::{new_shared_state, AppState, PipelineState, RecordingSession, SharedState};
pub use status::StatusReporter;
