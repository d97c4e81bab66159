//! Remote text-to-speech client.
//!
//! [`Synthesizer`] is the async seam the orchestrator calls after a
//! successful translation; [`ApiSynthesizer`] speaks the Coqui TTS server
//! wire format (`GET {base_url}/api/tts` returning WAV bytes). All
//! connection details come from [`SynthesisConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SynthesisConfig;

// ---------------------------------------------------------------------------
// SynthesisError
// ---------------------------------------------------------------------------

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// HTTP transport or connection error.
    #[error("synthesis request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("synthesis request timed out")]
    Timeout,

    /// The service answered with a non-success HTTP status.
    #[error("synthesis service returned HTTP {0}")]
    Status(u16),

    /// The service answered success but sent no audio.
    #[error("synthesis service returned no audio")]
    Empty,
}

impl From<reqwest::Error> for SynthesisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SynthesisError::Timeout
        } else {
            SynthesisError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Synthesizer trait
// ---------------------------------------------------------------------------

/// Async text-to-speech seam.
///
/// Returns the synthesized utterance as encoded audio bytes (WAV from the
/// production backend). Implementors must be `Send + Sync` so they can be
/// shared behind an `Arc<dyn Synthesizer>`.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language_code: &str)
        -> Result<Vec<u8>, SynthesisError>;
}

// ---------------------------------------------------------------------------
// ApiSynthesizer
// ---------------------------------------------------------------------------

/// Calls a Coqui-TTS-compatible `/api/tts` endpoint.
pub struct ApiSynthesizer {
    client: reqwest::Client,
    config: SynthesisConfig,
}

impl ApiSynthesizer {
    /// Build an `ApiSynthesizer` from application config.
    pub fn from_config(config: &SynthesisConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Synthesizer for ApiSynthesizer {
    /// Request synthesis of `text` in `language_code`.
    ///
    /// The optional configured voice is forwarded as `speaker_id` for
    /// multi-speaker models; single-speaker servers ignore it.
    async fn synthesize(
        &self,
        text: &str,
        language_code: &str,
    ) -> Result<Vec<u8>, SynthesisError> {
        let url = format!("{}/api/tts", self.config.base_url);

        let mut query: Vec<(&str, &str)> = vec![("text", text), ("language_id", language_code)];
        let voice = self.config.voice.as_deref().unwrap_or("");
        if !voice.is_empty() {
            query.push(("speaker_id", voice));
        }

        let mut req = self.client.get(&url).query(&query);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(SynthesisError::Empty);
        }

        Ok(bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
