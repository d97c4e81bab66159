//! The pipeline orchestrator.
//!
//! One task owns the whole cycle: it receives UI commands, arms and spawns
//! the one-shot capture worker, and on a successful transcript runs
//! translate → synthesize → save → play strictly in sequence. Exactly one
//! cycle is in flight at any time; a start request that arrives while busy
//! is dropped, never queued. Every terminal path — success, unintelligible
//! audio, any stage failure — discards the session, returns to idle and
//! arms a fresh worker for the next cycle.
//!
//! The orchestrator stays non-idle through the playback hand-off, so the
//! fixed artifact path can never be overwritten while a previous cycle is
//! still writing or queueing it.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::audio::UtteranceSource;
use crate::catalog;
use crate::pipeline::state::{PipelineState, RecordingSession, SharedState};
use crate::pipeline::status::StatusReporter;
use crate::playback::Playback;
use crate::recognize::{Recognizer, WorkerHandle, WorkerOutcome};
use crate::synth::Synthesizer;
use crate::translate::Translator;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Requests the UI sends to the orchestrator.
#[derive(Debug, Clone)]
pub enum PipelineCommand {
    /// Begin a capture-translate-speak cycle targeting `language_code`.
    Start { language_code: String },
    /// Synthesize the most recent translation into `dest`.
    Download { dest: PathBuf },
}

/// Builds a fresh [`UtteranceSource`] for each worker arming.
pub type SourceFactory = Arc<dyn Fn() -> Box<dyn UtteranceSource> + Send + Sync>;

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

pub struct PipelineOrchestrator {
    shared: SharedState,
    session: Option<RecordingSession>,
    /// The armed worker for the next cycle. `None` exactly while one runs.
    worker: Option<WorkerHandle>,
    sources: SourceFactory,
    recognizer: Arc<dyn Recognizer>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn Synthesizer>,
    playback: Arc<dyn Playback>,
    status: StatusReporter,
    /// Fixed path the synthesized audio is saved to each cycle.
    artifact_path: PathBuf,
    /// Last completed (translated text, language code), kept for downloads.
    last_translation: Option<(String, String)>,
    outcome_tx: mpsc::Sender<WorkerOutcome>,
    outcome_rx: Option<mpsc::Receiver<WorkerOutcome>>,
}

impl PipelineOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shared: SharedState,
        sources: SourceFactory,
        recognizer: Arc<dyn Recognizer>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn Synthesizer>,
        playback: Arc<dyn Playback>,
        status: StatusReporter,
        artifact_path: PathBuf,
    ) -> Self {
        if let Some(parent) = artifact_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("could not create data directory {parent:?}: {e}");
            }
        }

        let (outcome_tx, outcome_rx) = mpsc::channel(1);

        let mut orchestrator = Self {
            shared,
            session: None,
            worker: None,
            sources,
            recognizer,
            translator,
            synthesizer,
            playback,
            status,
            artifact_path,
            last_translation: None,
            outcome_tx,
            outcome_rx: Some(outcome_rx),
        };
        orchestrator.worker = Some(orchestrator.make_worker());
        orchestrator
    }

    /// Event loop: runs until the command channel closes, then lets any
    /// in-flight recording settle before returning.
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<PipelineCommand>) {
        // Moved out so `select!` can poll it alongside handler calls.
        let mut outcome_rx = self
            .outcome_rx
            .take()
            .expect("run may only be called once");

        log::info!("pipeline orchestrator running");

        loop {
            tokio::select! {
                command = command_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                Some(outcome) = outcome_rx.recv() => {
                    self.handle_outcome(outcome).await;
                }
            }
        }

        // Drain: a worker spawned before shutdown still owes its outcome.
        while self.pipeline_state() == PipelineState::Recording {
            match outcome_rx.recv().await {
                Some(outcome) => self.handle_outcome(outcome).await,
                None => break,
            }
        }

        log::info!("pipeline orchestrator shut down");
    }

    async fn handle_command(&mut self, command: PipelineCommand) {
        match command {
            PipelineCommand::Start { language_code } => self.handle_start(language_code).await,
            PipelineCommand::Download { dest } => self.handle_download(dest).await,
        }
    }

    // ── Start ────────────────────────────────────────────────────────────

    async fn handle_start(&mut self, language_code: String) {
        if self.pipeline_state().is_busy() {
            // The UI disables start while busy; anything that slips through
            // the race window is dropped, never queued.
            log::debug!("start ignored: cycle already in flight");
            return;
        }

        if !catalog::is_valid_code(&language_code) {
            self.status.report("select a target language first");
            return;
        }

        let Some(worker) = self.worker.take() else {
            log::error!("no armed worker while idle");
            return;
        };

        self.session = Some(RecordingSession::new(language_code));
        self.set_pipeline(PipelineState::Recording);
        let _ = worker.spawn();
    }

    // ── Worker outcome ───────────────────────────────────────────────────

    async fn handle_outcome(&mut self, outcome: WorkerOutcome) {
        if self.pipeline_state() != PipelineState::Recording {
            log::warn!("discarding worker outcome outside a recording cycle");
            return;
        }

        match outcome {
            WorkerOutcome::Recognized(text) => self.continue_cycle(text).await,
            // The worker already reported the reason; just close out.
            WorkerOutcome::Unintelligible
            | WorkerOutcome::ServiceError(_)
            | WorkerOutcome::Failure(_) => self.finish_cycle(),
        }
    }

    /// Translate → synthesize → save → play, bailing to idle on any failure.
    async fn continue_cycle(&mut self, recognized: String) {
        let language_code = match &mut self.session {
            Some(session) => {
                session.recognized = Some(recognized.clone());
                session.language_code.clone()
            }
            None => {
                log::error!("recognized text without an active session");
                self.finish_cycle();
                return;
            }
        };
        self.shared.lock().unwrap().recognized_text = Some(recognized.clone());

        // ── Translate ────────────────────────────────────────────────────
        self.set_pipeline(PipelineState::Translating);
        let translated = match self.translator.translate(&recognized, &language_code).await {
            Ok(text) => text,
            Err(e) => {
                self.status.report(format!("translation failed: {e}"));
                self.finish_cycle();
                return;
            }
        };
        self.status.report(format!("translated: \"{translated}\""));
        if let Some(session) = &mut self.session {
            session.translated = Some(translated.clone());
        }
        self.shared.lock().unwrap().translated_text = Some(translated.clone());

        // ── Synthesize ───────────────────────────────────────────────────
        self.set_pipeline(PipelineState::Synthesizing);
        let audio = match self
            .synthesizer
            .synthesize(&translated, &language_code)
            .await
        {
            Ok(audio) => audio,
            Err(e) => {
                self.status.report(format!("synthesis failed: {e}"));
                self.finish_cycle();
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.artifact_path, &audio) {
            self.status.report(format!("could not save audio: {e}"));
            self.finish_cycle();
            return;
        }
        if let Some(session) = &mut self.session {
            session.artifact = Some(self.artifact_path.clone());
        }
        self.last_translation = Some((translated, language_code));
        self.shared.lock().unwrap().can_download = true;
        self.status.report("audio saved");

        // ── Play ─────────────────────────────────────────────────────────
        self.set_pipeline(PipelineState::Playing);
        let playback = Arc::clone(&self.playback);
        let path = self.artifact_path.clone();
        match tokio::task::spawn_blocking(move || playback.play(&path)).await {
            Ok(Ok(())) => self.status.report("audio played"),
            Ok(Err(e)) => self.status.report(format!("playback failed: {e}")),
            Err(e) => self.status.report(format!("playback task failed: {e}")),
        }

        self.finish_cycle();
    }

    /// Every terminal path funnels through here: drop the session, return
    /// to idle, arm a fresh worker.
    fn finish_cycle(&mut self) {
        self.session = None;
        self.set_pipeline(PipelineState::Idle);
        self.worker = Some(self.make_worker());
        log::debug!("cycle finished; pipeline idle");
    }

    // ── Download ─────────────────────────────────────────────────────────

    /// Synthesize a fresh copy of the last translation into `dest`.
    async fn handle_download(&mut self, dest: PathBuf) {
        let Some((text, language_code)) = self.last_translation.clone() else {
            self.status.report("nothing to download yet");
            return;
        };

        match self.synthesizer.synthesize(&text, &language_code).await {
            Ok(audio) => match std::fs::write(&dest, &audio) {
                Ok(()) => self
                    .status
                    .report(format!("saved translation to {}", dest.display())),
                Err(e) => self.status.report(format!("could not save download: {e}")),
            },
            Err(e) => self.status.report(format!("download synthesis failed: {e}")),
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn make_worker(&self) -> WorkerHandle {
        WorkerHandle::new(
            (self.sources)(),
            Arc::clone(&self.recognizer),
            self.status.clone(),
            self.outcome_tx.clone(),
        )
    }

    fn pipeline_state(&self) -> PipelineState {
        self.shared.lock().unwrap().pipeline
    }

    fn set_pipeline(&self, state: PipelineState) {
        self.shared.lock().unwrap().pipeline = state;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::audio::CaptureError;
    use crate::pipeline::state::new_shared_state;
    use crate::playback::PlaybackError;
    use crate::recognize::MockRecognizer;
    use crate::synth::SynthesisError;
    use crate::translate::TranslationError;

    // ── Test doubles ─────────────────────────────────────────────────────

    struct TestSource {
        fail_open: bool,
        gate: Option<std::sync::mpsc::Receiver<()>>,
    }

    impl UtteranceSource for TestSource {
        fn open(&mut self) -> Result<(), CaptureError> {
            if self.fail_open {
                Err(CaptureError::NoDevice)
            } else {
                Ok(())
            }
        }

        fn capture(&mut self) -> Result<Vec<f32>, CaptureError> {
            if let Some(gate) = &self.gate {
                let _ = gate.recv();
            }
            Ok(vec![0.1_f32; 1_600])
        }
    }

    /// Factory that counts armings; an optional gate blocks the first
    /// source's capture until released.
    fn source_factory(
        fail_open: bool,
        gate: Option<std::sync::mpsc::Receiver<()>>,
    ) -> (SourceFactory, Arc<AtomicUsize>) {
        let armed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&armed);
        let gate = Mutex::new(gate);
        let factory: SourceFactory = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(TestSource {
                fail_open,
                gate: gate.lock().unwrap().take(),
            })
        });
        (factory, armed)
    }

    /// Pops one scripted reply per call: `Some` translates, `None` errors.
    /// An exhausted script also errors.
    struct MockTranslator {
        replies: Mutex<Vec<Option<String>>>,
        calls: AtomicUsize,
    }

    impl MockTranslator {
        fn replying(replies: &[&str]) -> Arc<Self> {
            let script: Vec<Option<&str>> = replies.iter().map(|s| Some(*s)).collect();
            Self::scripted(&script)
        }

        fn scripted(replies: &[Option<&str>]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| r.map(str::to_string)).collect()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Self::replying(&[])
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate(
            &self,
            _text: &str,
            _target_code: &str,
        ) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(TranslationError::Status(500));
            }
            match replies.remove(0) {
                Some(text) => Ok(text),
                None => Err(TranslationError::Status(500)),
            }
        }
    }

    struct MockSynthesizer {
        ok: bool,
        calls: AtomicUsize,
    }

    impl MockSynthesizer {
        fn new(ok: bool) -> Arc<Self> {
            Arc::new(Self {
                ok,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Synthesizer for MockSynthesizer {
        async fn synthesize(
            &self,
            text: &str,
            language_code: &str,
        ) -> Result<Vec<u8>, SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.ok {
                Ok(format!("wav:{text}:{language_code}").into_bytes())
            } else {
                Err(SynthesisError::Status(500))
            }
        }
    }

    struct MockPlayback {
        ok: bool,
        played: Mutex<Vec<PathBuf>>,
    }

    impl MockPlayback {
        fn new(ok: bool) -> Arc<Self> {
            Arc::new(Self {
                ok,
                played: Mutex::new(Vec::new()),
            })
        }
    }

    impl Playback for MockPlayback {
        fn play(&self, path: &Path) -> Result<(), PlaybackError> {
            self.played.lock().unwrap().push(path.to_path_buf());
            if self.ok {
                Ok(())
            } else {
                Err(PlaybackError::Output("no speakers".into()))
            }
        }
    }

    // ── Harness ──────────────────────────────────────────────────────────

    struct Harness {
        orchestrator: PipelineOrchestrator,
        shared: SharedState,
        status_rx: mpsc::UnboundedReceiver<String>,
        translator: Arc<MockTranslator>,
        synthesizer: Arc<MockSynthesizer>,
        playback: Arc<MockPlayback>,
        armed: Arc<AtomicUsize>,
        artifact: PathBuf,
        _dir: tempfile::TempDir,
    }

    fn harness(
        recognizer: MockRecognizer,
        translator: Arc<MockTranslator>,
        synth_ok: bool,
        playback_ok: bool,
        fail_capture: bool,
        gate: Option<std::sync::mpsc::Receiver<()>>,
    ) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("translated_audio.wav");
        let shared = new_shared_state();
        let (status, status_rx) = StatusReporter::channel();
        let (sources, armed) = source_factory(fail_capture, gate);
        let synthesizer = MockSynthesizer::new(synth_ok);
        let playback = MockPlayback::new(playback_ok);

        let orchestrator = PipelineOrchestrator::new(
            Arc::clone(&shared),
            sources,
            Arc::new(recognizer),
            Arc::clone(&translator) as Arc<dyn Translator>,
            Arc::clone(&synthesizer) as Arc<dyn Synthesizer>,
            Arc::clone(&playback) as Arc<dyn Playback>,
            status,
            artifact.clone(),
        );

        Harness {
            orchestrator,
            shared,
            status_rx,
            translator,
            synthesizer,
            playback,
            armed,
            artifact,
            _dir: dir,
        }
    }

    fn drain_statuses(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    /// Run `commands` through the event loop to completion.
    async fn run_commands(orchestrator: PipelineOrchestrator, commands: Vec<PipelineCommand>) {
        let (tx, rx) = mpsc::channel(16);
        for command in commands {
            tx.send(command).await.unwrap();
        }
        drop(tx);
        orchestrator.run(rx).await;
    }

    /// Drive one full cycle through the private handlers, deterministic.
    async fn drive_cycle(
        orchestrator: &mut PipelineOrchestrator,
        outcome_rx: &mut mpsc::Receiver<WorkerOutcome>,
        language_code: &str,
    ) {
        orchestrator.handle_start(language_code.to_string()).await;
        let outcome = outcome_rx.recv().await.expect("worker outcome");
        orchestrator.handle_outcome(outcome).await;
    }

    // ── Tests ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn full_cycle_translates_saves_and_plays() {
        let mut h = harness(
            MockRecognizer::recognized("Hello world"),
            MockTranslator::replying(&["Bonjour le monde"]),
            true,
            true,
            false,
            None,
        );

        run_commands(
            h.orchestrator,
            vec![PipelineCommand::Start {
                language_code: "fr".into(),
            }],
        )
        .await;

        let state = h.shared.lock().unwrap();
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert_eq!(state.recognized_text.as_deref(), Some("Hello world"));
        assert_eq!(state.translated_text.as_deref(), Some("Bonjour le monde"));
        assert!(state.can_download);
        drop(state);

        let saved = std::fs::read(&h.artifact).unwrap();
        assert_eq!(saved, b"wav:Bonjour le monde:fr");
        assert_eq!(
            h.playback.played.lock().unwrap().clone(),
            vec![h.artifact.clone()]
        );

        let statuses = drain_statuses(&mut h.status_rx);
        let index_of = |needle: &str| {
            statuses
                .iter()
                .position(|s| s.contains(needle))
                .unwrap_or_else(|| panic!("missing status containing {needle:?}: {statuses:?}"))
        };
        assert!(index_of("recognized") < index_of("translated"));
        assert!(index_of("translated") < index_of("audio saved"));
        assert!(index_of("audio saved") < index_of("audio played"));
    }

    #[tokio::test]
    async fn start_without_language_selection_is_rejected() {
        let mut h = harness(
            MockRecognizer::recognized("never used"),
            MockTranslator::replying(&["never used"]),
            true,
            true,
            false,
            None,
        );

        run_commands(
            h.orchestrator,
            vec![PipelineCommand::Start {
                language_code: String::new(),
            }],
        )
        .await;

        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Idle);
        assert_eq!(h.translator.calls.load(Ordering::SeqCst), 0);
        // Only the worker armed at construction; nothing spawned.
        assert_eq!(h.armed.load(Ordering::SeqCst), 1);
        let statuses = drain_statuses(&mut h.status_rx);
        assert!(statuses.iter().any(|s| s.contains("select a target language")));
    }

    #[tokio::test]
    async fn capture_failure_skips_every_downstream_stage() {
        let h = harness(
            MockRecognizer::recognized("never used"),
            MockTranslator::replying(&["never used"]),
            true,
            true,
            true,
            None,
        );
        let translator = Arc::clone(&h.translator);
        let synthesizer = Arc::clone(&h.synthesizer);
        let playback = Arc::clone(&h.playback);
        let shared = Arc::clone(&h.shared);

        run_commands(
            h.orchestrator,
            vec![PipelineCommand::Start {
                language_code: "fr".into(),
            }],
        )
        .await;

        let state = shared.lock().unwrap();
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert!(!state.can_download);
        drop(state);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
        assert!(playback.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn translation_failure_keeps_transcript_and_returns_to_idle() {
        let mut h = harness(
            MockRecognizer::recognized("Hello world"),
            MockTranslator::failing(),
            true,
            true,
            false,
            None,
        );
        let synthesizer = Arc::clone(&h.synthesizer);

        run_commands(
            h.orchestrator,
            vec![PipelineCommand::Start {
                language_code: "fr".into(),
            }],
        )
        .await;

        let state = h.shared.lock().unwrap();
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert_eq!(state.recognized_text.as_deref(), Some("Hello world"));
        assert!(state.translated_text.is_none());
        assert!(!state.can_download);
        drop(state);
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);

        let statuses = drain_statuses(&mut h.status_rx);
        assert!(statuses.iter().any(|s| s.contains("translation failed")));
    }

    #[tokio::test]
    async fn synthesis_failure_saves_nothing() {
        let mut h = harness(
            MockRecognizer::recognized("Hello world"),
            MockTranslator::replying(&["Bonjour le monde"]),
            false,
            true,
            false,
            None,
        );
        let playback = Arc::clone(&h.playback);

        run_commands(
            h.orchestrator,
            vec![PipelineCommand::Start {
                language_code: "fr".into(),
            }],
        )
        .await;

        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Idle);
        assert!(!h.shared.lock().unwrap().can_download);
        assert!(!h.artifact.exists());
        assert!(playback.played.lock().unwrap().is_empty());

        let statuses = drain_statuses(&mut h.status_rx);
        assert!(statuses.iter().any(|s| s.contains("synthesis failed")));
    }

    #[tokio::test]
    async fn playback_failure_still_returns_to_idle() {
        let mut h = harness(
            MockRecognizer::recognized("Hello world"),
            MockTranslator::replying(&["Bonjour le monde"]),
            true,
            false,
            false,
            None,
        );

        run_commands(
            h.orchestrator,
            vec![PipelineCommand::Start {
                language_code: "fr".into(),
            }],
        )
        .await;

        let state = h.shared.lock().unwrap();
        assert_eq!(state.pipeline, PipelineState::Idle);
        // The artifact was saved before playback, so download stays live.
        assert!(state.can_download);
        drop(state);

        let statuses = drain_statuses(&mut h.status_rx);
        assert!(statuses.iter().any(|s| s.contains("playback failed")));
    }

    #[tokio::test]
    async fn start_while_recording_is_dropped_not_queued() {
        let (gate_tx, gate_rx) = std::sync::mpsc::channel();
        let mut h = harness(
            MockRecognizer::recognized("Hello world"),
            MockTranslator::replying(&["Bonjour le monde"]),
            true,
            true,
            false,
            Some(gate_rx),
        );

        let mut outcome_rx = h.orchestrator.outcome_rx.take().unwrap();

        h.orchestrator.handle_start("fr".into()).await;
        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Recording);
        assert_eq!(h.armed.load(Ordering::SeqCst), 1);

        // A second start while the first is still capturing must be a no-op.
        h.orchestrator.handle_start("es".into()).await;
        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Recording);
        assert_eq!(h.armed.load(Ordering::SeqCst), 1);

        gate_tx.send(()).unwrap();
        let outcome = outcome_rx.recv().await.unwrap();
        h.orchestrator.handle_outcome(outcome).await;

        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Idle);
        // One cycle ran, one fresh worker armed for the next.
        assert_eq!(h.armed.load(Ordering::SeqCst), 2);
        assert_eq!(h.translator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn consecutive_cycles_refresh_the_artifact() {
        let mut h = harness(
            MockRecognizer::recognized("Hello world"),
            MockTranslator::replying(&["première", "deuxième"]),
            true,
            true,
            false,
            None,
        );
        let mut outcome_rx = h.orchestrator.outcome_rx.take().unwrap();

        drive_cycle(&mut h.orchestrator, &mut outcome_rx, "fr").await;
        drive_cycle(&mut h.orchestrator, &mut outcome_rx, "fr").await;

        // The artifact always holds the most recent translation.
        let saved = std::fs::read(&h.artifact).unwrap();
        assert_eq!(saved, "wav:deuxième:fr".as_bytes());
        assert_eq!(h.shared.lock().unwrap().translated_text.as_deref(), Some("deuxième"));
        assert_eq!(h.armed.load(Ordering::SeqCst), 3);
        assert_eq!(h.playback.played.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_cycle_rearms_for_a_fresh_start() {
        let mut h = harness(
            MockRecognizer::recognized("Hello world"),
            MockTranslator::scripted(&[None, Some("Bonjour le monde")]),
            true,
            true,
            false,
            None,
        );
        let mut outcome_rx = h.orchestrator.outcome_rx.take().unwrap();

        // Cycle 1 fails in translation; it must still settle to Idle with a
        // fresh worker armed.
        drive_cycle(&mut h.orchestrator, &mut outcome_rx, "fr").await;
        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Idle);
        assert!(!h.shared.lock().unwrap().can_download);
        assert_eq!(h.armed.load(Ordering::SeqCst), 2);

        // A second start must begin recording, not be refused.
        h.orchestrator.handle_start("fr".into()).await;
        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Recording);
        let outcome = outcome_rx.recv().await.unwrap();
        h.orchestrator.handle_outcome(outcome).await;

        let state = h.shared.lock().unwrap();
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert_eq!(state.translated_text.as_deref(), Some("Bonjour le monde"));
        assert!(state.can_download);
        drop(state);
        assert_eq!(h.armed.load(Ordering::SeqCst), 3);
        assert_eq!(
            std::fs::read(&h.artifact).unwrap(),
            b"wav:Bonjour le monde:fr"
        );
    }

    #[tokio::test]
    async fn download_before_any_translation_is_a_no_op() {
        let mut h = harness(
            MockRecognizer::recognized("never used"),
            MockTranslator::replying(&[]),
            true,
            true,
            false,
            None,
        );
        let dest = h._dir.path().join("download.wav");

        h.orchestrator.handle_download(dest.clone()).await;

        assert!(!dest.exists());
        let statuses = drain_statuses(&mut h.status_rx);
        assert!(statuses.iter().any(|s| s.contains("nothing to download")));
    }

    #[tokio::test]
    async fn download_synthesizes_a_fresh_copy() {
        let mut h = harness(
            MockRecognizer::recognized("Hello world"),
            MockTranslator::replying(&["Bonjour le monde"]),
            true,
            true,
            false,
            None,
        );
        let mut outcome_rx = h.orchestrator.outcome_rx.take().unwrap();
        let dest = h._dir.path().join("download.wav");

        drive_cycle(&mut h.orchestrator, &mut outcome_rx, "fr").await;
        h.orchestrator.handle_download(dest.clone()).await;

        let saved = std::fs::read(&dest).unwrap();
        assert_eq!(saved, b"wav:Bonjour le monde:fr");
        // One synthesis for the cycle, one for the download.
        assert_eq!(h.synthesizer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn download_works_while_a_new_recording_is_in_flight() {
        let (gate_tx, gate_rx) = std::sync::mpsc::channel();
        let mut h = harness(
            MockRecognizer::recognized("Hello world"),
            MockTranslator::replying(&["Bonjour le monde", "Hola mundo"]),
            true,
            true,
            false,
            None,
        );
        let mut outcome_rx = h.orchestrator.outcome_rx.take().unwrap();
        let dest = h._dir.path().join("download.wav");

        drive_cycle(&mut h.orchestrator, &mut outcome_rx, "fr").await;

        // Second cycle starts and blocks in capture; the gated source is
        // armed lazily, so hand it the gate by rebuilding the worker.
        let gate = Mutex::new(Some(gate_rx));
        let gated: SourceFactory = Arc::new(move || {
            Box::new(TestSource {
                fail_open: false,
                gate: gate.lock().unwrap().take(),
            })
        });
        h.orchestrator.sources = gated;
        h.orchestrator.worker = Some(h.orchestrator.make_worker());
        h.orchestrator.handle_start("es".into()).await;
        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Recording);

        h.orchestrator.handle_download(dest.clone()).await;
        let saved = std::fs::read(&dest).unwrap();
        assert_eq!(saved, b"wav:Bonjour le monde:fr");

        gate_tx.send(()).unwrap();
        let outcome = outcome_rx.recv().await.unwrap();
        h.orchestrator.handle_outcome(outcome).await;
        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Idle);
    }

    #[tokio::test]
    async fn stray_outcome_while_idle_is_ignored() {
        let mut h = harness(
            MockRecognizer::recognized("never used"),
            MockTranslator::replying(&["never used"]),
            true,
            true,
            false,
            None,
        );

        h.orchestrator
            .handle_outcome(WorkerOutcome::Recognized("ghost".into()))
            .await;

        assert_eq!(h.shared.lock().unwrap().pipeline, PipelineState::Idle);
        assert!(h.shared.lock().unwrap().recognized_text.is_none());
        assert_eq!(h.translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unintelligible_audio_ends_the_cycle_quietly() {
        let h = harness(
            MockRecognizer::unintelligible(),
            MockTranslator::replying(&["never used"]),
            true,
            true,
            false,
            None,
        );
        let translator = Arc::clone(&h.translator);
        let shared = Arc::clone(&h.shared);

        run_commands(
            h.orchestrator,
            vec![PipelineCommand::Start {
                language_code: "fr".into(),
            }],
        )
        .await;

        assert_eq!(shared.lock().unwrap().pipeline, PipelineState::Idle);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }
}
