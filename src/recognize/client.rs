//! Remote speech-recognition client.
//!
//! [`Recognizer`] is the async seam the capture worker calls;
//! [`ApiRecognizer`] is the production implementation speaking the
//! whisper.cpp server wire format: multipart WAV upload to
//! `{base_url}/inference`, JSON `{ "text": … }` response. All connection
//! details come from [`RecognitionConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::RecognitionConfig;

// ---------------------------------------------------------------------------
// RecognizeOutcome
// ---------------------------------------------------------------------------

/// Successful recognition responses.
///
/// A service that answered but heard no linguistic content is not an error —
/// it is [`RecognizeOutcome::Unintelligible`], which the pipeline treats
/// differently from a transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizeOutcome {
    /// Non-empty transcript of the utterance.
    Recognized(String),
    /// The service understood no speech in the audio.
    Unintelligible,
}

// ---------------------------------------------------------------------------
// RecognizeError
// ---------------------------------------------------------------------------

/// Errors from the recognition service or transport.
#[derive(Debug, Clone, Error)]
pub enum RecognizeError {
    /// HTTP transport or connection error.
    #[error("recognition request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("recognition request timed out")]
    Timeout,

    /// The service answered with a non-success HTTP status.
    #[error("recognition service returned HTTP {0}")]
    Status(u16),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse recognition response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RecognizeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecognizeError::Timeout
        } else {
            RecognizeError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Recognizer trait
// ---------------------------------------------------------------------------

/// Async speech-to-text seam.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// behind an `Arc<dyn Recognizer>`.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Submit one WAV-encoded utterance and return the transcript, or
    /// [`RecognizeOutcome::Unintelligible`] when the service heard nothing.
    async fn recognize(&self, wav: &[u8]) -> Result<RecognizeOutcome, RecognizeError>;
}

// ---------------------------------------------------------------------------
// ApiRecognizer
// ---------------------------------------------------------------------------

/// Wire format of the recognition response.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Production [`Recognizer`] over a whisper.cpp-compatible HTTP endpoint.
pub struct ApiRecognizer {
    client: reqwest::Client,
    config: RecognitionConfig,
}

impl ApiRecognizer {
    /// Build an `ApiRecognizer` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`; a default client is the last-resort fallback
    /// if the builder fails (should never happen in practice).
    pub fn from_config(config: &RecognitionConfig) -> Self {
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
impl Recognizer for ApiRecognizer {
    /// Upload the utterance as multipart form data.
    ///
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string — safe for local servers that
    /// require no authentication.
    async fn recognize(&self, wav: &[u8]) -> Result<RecognizeOutcome, RecognizeError> {
        let url = format!("{}/inference", self.config.base_url);

        let file_part = reqwest::multipart::Part::bytes(wav.to_vec())
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| RecognizeError::Request(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("response_format", "json");

        if let Some(hint) = self.config.language_hint.as_deref() {
            if !hint.is_empty() {
                form = form.text("language", hint.to_string());
            }
        }

        let mut req = self.client.post(&url).multipart(form);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognizeError::Status(status.as_u16()));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| RecognizeError::Parse(e.to_string()))?;

        let text = parsed.text.trim().to_string();
        if text.is_empty() {
            Ok(RecognizeOutcome::Unintelligible)
        } else {
            Ok(RecognizeOutcome::Recognized(text))
        }
    }
}

// ---------------------------------------------------------------------------
// MockRecognizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without any network.
#[cfg(test)]
pub struct MockRecognizer {
    response: Result<RecognizeOutcome, RecognizeError>,
}

#[cfg(test)]
impl MockRecognizer {
    /// Mock that always recognizes `text`.
    pub fn recognized(text: impl Into<String>) -> Self {
        Self {
            response: Ok(RecognizeOutcome::Recognized(text.into())),
        }
    }

    /// Mock that always hears nothing.
    pub fn unintelligible() -> Self {
        Self {
            response: Ok(RecognizeOutcome::Unintelligible),
        }
    }

    /// Mock that always fails with `error`.
    pub fn err(error: RecognizeError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Recognizer for MockRecognizer {
    async fn recognize(&self, _wav: &[u8]) -> Result<RecognizeOutcome, RecognizeError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
