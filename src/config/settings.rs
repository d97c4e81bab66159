//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// RecognitionConfig
// ---------------------------------------------------------------------------

/// Settings for the remote speech-recognition service.
///
/// The client speaks the whisper.cpp server wire format: a multipart WAV
/// upload to `{base_url}/inference` answered with JSON `{ "text": … }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Base URL of the recognition endpoint.
    ///
    /// Default: `http://localhost:9000` (local whisper.cpp server).
    pub base_url: String,
    /// API key — `None` for local/unauthenticated servers.
    pub api_key: Option<String>,
    /// Spoken-language hint as an ISO-639-1 code, or `None` to let the
    /// service auto-detect.
    pub language_hint: Option<String>,
    /// Maximum seconds to wait for a recognition response.
    pub timeout_secs: u64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".into(),
            api_key: None,
            language_hint: None,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// TranslationConfig
// ---------------------------------------------------------------------------

/// Settings for the remote text-translation service.
///
/// The client speaks the LibreTranslate wire format: JSON POST to
/// `{base_url}/translate` answered with `{ "translatedText": … }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Base URL of the translation endpoint.
    ///
    /// Default: `http://localhost:5000` (local LibreTranslate).
    pub base_url: String,
    /// API key — `None` for local/unauthenticated servers.
    pub api_key: Option<String>,
    /// Maximum seconds to wait for a translation response.
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// SynthesisConfig
// ---------------------------------------------------------------------------

/// Settings for the remote text-to-speech service.
///
/// The client speaks the Coqui TTS server wire format: GET
/// `{base_url}/api/tts?text=…&language_id=…` answered with raw WAV bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Base URL of the synthesis endpoint.
    ///
    /// Default: `http://localhost:5002` (local Coqui TTS server).
    pub base_url: String,
    /// API key — `None` for local/unauthenticated servers.
    pub api_key: Option<String>,
    /// Speaker/voice identifier forwarded to the service, if it supports one.
    pub voice: Option<String>,
    /// Maximum seconds to wait for a synthesis response.
    pub timeout_secs: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5002".into(),
            api_key: None,
            voice: None,
            timeout_secs: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for microphone capture and utterance endpoint detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// RMS amplitude threshold; frames below this count as silence.
    pub silence_threshold: f32,
    /// Seconds of trailing silence after speech that end the utterance.
    pub silence_hold_secs: f32,
    /// Hard ceiling on utterance length in seconds; recording stops here
    /// even if the speaker has not paused.
    pub max_utterance_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            silence_threshold: 0.01,
            silence_hold_secs: 0.8,
            max_utterance_secs: 30.0,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window appearance and behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels.  `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
    /// Keep the window floating above all other windows.
    pub always_on_top: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
            always_on_top: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voice_translator::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Speech-recognition service settings.
    pub recognition: RecognitionConfig,
    /// Translation service settings.
    pub translation: TranslationConfig,
    /// Text-to-speech service settings.
    pub synthesis: SynthesisConfig,
    /// Microphone capture / endpoint detection settings.
    pub audio: AudioConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
