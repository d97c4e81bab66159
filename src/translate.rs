//! Remote text-translation client.
//!
//! [`Translator`] is the async seam the orchestrator calls between the
//! Recording and Synthesizing stages; [`ApiTranslator`] speaks the
//! LibreTranslate wire format (`POST {base_url}/translate`, source language
//! auto-detected). All connection details come from [`TranslationConfig`];
//! nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranslationConfig;

// ---------------------------------------------------------------------------
// TranslationError
// ---------------------------------------------------------------------------

/// Errors that can occur during translation.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// HTTP transport or connection error.
    #[error("translation request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The service answered with a non-success HTTP status.
    #[error("translation service returned HTTP {0}")]
    Status(u16),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// The service returned no usable text.
    #[error("translation service returned an empty result")]
    Empty,
}

impl From<reqwest::Error> for TranslationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslationError::Timeout
        } else {
            TranslationError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async translation seam.
///
/// Implementors must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn Translator>`. Each call is independent; no session state.
///
/// # Arguments
/// * `text`        – Non-empty source text (the recognized transcript).
/// * `target_code` – Non-empty target language code from the catalog.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError>;
}

// ---------------------------------------------------------------------------
// ApiTranslator
// ---------------------------------------------------------------------------

/// Calls a LibreTranslate-compatible `/translate` endpoint.
pub struct ApiTranslator {
    client: reqwest::Client,
    config: TranslationConfig,
}

impl ApiTranslator {
    /// Build an `ApiTranslator` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`; a default client is the last-resort fallback
    /// if the builder fails (should never happen in practice).
    pub fn from_config(config: &TranslationConfig) -> Self {
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
impl Translator for ApiTranslator {
    /// Send `text` for translation with source-language auto-detection.
    ///
    /// The `api_key` field is included in the body only when configured and
    /// non-empty, matching how hosted LibreTranslate instances authenticate.
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        let url = format!("{}/translate", self.config.base_url);

        let mut body = serde_json::json!({
            "q":      text,
            "source": "auto",
            "target": target_code,
            "format": "text",
        });

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            body["api_key"] = serde_json::Value::String(key.to_string());
        }

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Status(status.as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslationError::Parse(e.to_string()))?;

        let translated = json["translatedText"]
            .as_str()
            .ok_or(TranslationError::Empty)?
            .trim()
            .to_string();

        if translated.is_empty() {
            return Err(TranslationError::Empty);
        }

        Ok(translated)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
