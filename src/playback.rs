//! Audio playback of synthesized speech.
//!
//! rodio's `OutputStream` is not `Send`, so [`RodioPlayback`] parks it on a
//! dedicated thread and talks to it over channels. [`Playback::play`] is a
//! blocking hand-off: it returns once the file has been decoded and queued
//! on the output device, not when the audio finishes sounding. Starting a
//! new file stops whatever was still playing and releases the old file
//! handle, so the artifact on disk can be overwritten between cycles.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use rodio::{Decoder, OutputStream, Sink};
use thiserror::Error;

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No usable audio output device.
    #[error("audio output unavailable: {0}")]
    Output(String),

    /// The audio file could not be opened.
    #[error("could not open audio file: {0}")]
    Open(String),

    /// The audio file could not be decoded.
    #[error("could not decode audio file: {0}")]
    Decode(String),

    /// The playback thread has exited.
    #[error("playback thread is gone")]
    Closed,
}

// ---------------------------------------------------------------------------
// Playback trait
// ---------------------------------------------------------------------------

/// Seam for queueing a synthesized file on the speakers.
///
/// `play` blocks briefly (decode + queue); callers on the async runtime
/// should wrap it in `spawn_blocking`.
pub trait Playback: Send + Sync {
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

// ---------------------------------------------------------------------------
// RodioPlayback
// ---------------------------------------------------------------------------

struct PlayRequest {
    path: PathBuf,
    reply: mpsc::Sender<Result<(), PlaybackError>>,
}

/// Production [`Playback`] backed by a dedicated rodio thread.
pub struct RodioPlayback {
    requests: mpsc::Sender<PlayRequest>,
}

impl RodioPlayback {
    /// Spawn the playback thread and open the default output device.
    ///
    /// Fails up front when no output device exists, so the caller can fall
    /// back to a stub instead of failing every cycle.
    pub fn spawn() -> Result<Self, PlaybackError> {
        let (request_tx, request_rx) = mpsc::channel::<PlayRequest>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), PlaybackError>>();

        thread::Builder::new()
            .name("playback".into())
            .spawn(move || playback_thread(request_rx, ready_tx))
            .map_err(|e| PlaybackError::Output(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                requests: request_tx,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(PlaybackError::Closed),
        }
    }
}

impl Playback for RodioPlayback {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.requests
            .send(PlayRequest {
                path: path.to_path_buf(),
                reply: reply_tx,
            })
            .map_err(|_| PlaybackError::Closed)?;
        reply_rx.recv().map_err(|_| PlaybackError::Closed)?
    }
}

/// Owns the `OutputStream` and at most one live `Sink` for its lifetime.
fn playback_thread(
    requests: mpsc::Receiver<PlayRequest>,
    ready: mpsc::Sender<Result<(), PlaybackError>>,
) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::Output(e.to_string())));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    let mut current: Option<Sink> = None;

    while let Ok(request) = requests.recv() {
        // Stop the previous playback first; dropping the sink also drops
        // its reader, freeing the file for overwrite.
        if let Some(sink) = current.take() {
            sink.stop();
        }

        let result = (|| {
            let file =
                File::open(&request.path).map_err(|e| PlaybackError::Open(e.to_string()))?;
            let source = Decoder::new(BufReader::new(file))
                .map_err(|e| PlaybackError::Decode(e.to_string()))?;
            let sink =
                Sink::try_new(&handle).map_err(|e| PlaybackError::Output(e.to_string()))?;
            sink.append(source);
            current = Some(sink);
            Ok(())
        })();

        let _ = request.reply.send(result);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
