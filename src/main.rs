//! Application entry point — Voice Translator.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the service clients (recognition, translation, synthesis) from
//!    config and open the playback device (degrades to a stub when no
//!    output device exists).
//! 5. Create pipeline channels (`command`, `status`) and the shared state.
//! 6. Spawn the pipeline orchestrator on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::path::Path;
use std::sync::Arc;

use eframe::egui;
use tokio::sync::mpsc;
use voice_translator::{
    app::TranslatorApp,
    audio::MicUtteranceSource,
    config::{AppConfig, AppPaths},
    pipeline::{
        new_shared_state, PipelineCommand, PipelineOrchestrator, SourceFactory, StatusReporter,
    },
    playback::{Playback, PlaybackError, RodioPlayback},
    recognize::ApiRecognizer,
    synth::ApiSynthesizer,
    translate::ApiTranslator,
};

/// Stand-in used when no audio output device is available at startup; the
/// app still runs, each cycle just reports the playback failure.
struct UnavailablePlayback;

impl Playback for UnavailablePlayback {
    fn play(&self, _path: &Path) -> Result<(), PlaybackError> {
        Err(PlaybackError::Output("no output device".into()))
    }
}

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([520.0, 440.0])
        .with_min_inner_size([420.0, 360.0]);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voice Translator starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 workers — the service calls are all I/O bound)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Service clients + playback
    let recognizer = Arc::new(ApiRecognizer::from_config(&config.recognition));
    let translator = Arc::new(ApiTranslator::from_config(&config.translation));
    let synthesizer = Arc::new(ApiSynthesizer::from_config(&config.synthesis));

    let playback: Arc<dyn Playback> = match RodioPlayback::spawn() {
        Ok(playback) => Arc::new(playback),
        Err(e) => {
            log::warn!("Audio output unavailable ({e}); playback disabled");
            Arc::new(UnavailablePlayback)
        }
    };

    // Each cycle gets a fresh microphone source built from the same config.
    let audio_config = config.audio.clone();
    let sources: SourceFactory =
        Arc::new(move || Box::new(MicUtteranceSource::new(audio_config.clone())));

    // 5. Channels + shared state
    let (command_tx, command_rx) = mpsc::channel::<PipelineCommand>(16);
    let (status, status_rx) = StatusReporter::channel();
    let shared = new_shared_state();

    // 6. Pipeline orchestrator
    let orchestrator = PipelineOrchestrator::new(
        Arc::clone(&shared),
        sources,
        recognizer,
        translator,
        synthesizer,
        playback,
        status,
        AppPaths::new().artifact_file,
    );
    rt.spawn(orchestrator.run(command_rx));

    // 7. UI — blocks until the window closes
    let options = native_options(&config);
    let app = TranslatorApp::new(shared, command_tx, status_rx, config);

    eframe::run_native(
        "Voice Translator",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
