//! Text-translation collaborator.
//!
//! [`Translator`] is the async interface the pipeline depends on;
//! [`HttpTranslator`] is the production implementation speaking the
//! LibreTranslate wire format.  The target language is an ISO-639-1-like
//! code supplied by the user at runtime — there is no client-side whitelist,
//! so unsupported codes surface as service-reported errors.

use async_trait::async_trait;
use thiserror::Error;

pub mod api;

pub use api::HttpTranslator;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur during translation.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("translation request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// The service rejected the request (bad language code, quota, auth …).
    #[error("translation service error: {0}")]
    Service(String),

    /// The service returned a response with no usable text.
    #[error("translation service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async trait for text translation.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Translator>`).
///
/// # Arguments
/// * `text`        – Source text (assumed to match the transcription language).
/// * `target_lang` – ISO-639-1-like code of the language to translate into.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}
