//! Speech-synthesis collaborator.
//!
//! [`Synthesizer`] is the async interface the pipeline depends on;
//! [`HttpSynthesizer`] is the production implementation fetching MP3 audio
//! from a gTTS-compatible endpoint.

use async_trait::async_trait;
use thiserror::Error;

pub mod api;

pub use api::HttpSynthesizer;

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum TtsError {
    /// HTTP transport or connection error.
    #[error("synthesis request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("synthesis request timed out")]
    Timeout,

    /// The service rejected the request (bad language code, quota …).
    #[error("synthesis service error: HTTP {0}")]
    Service(u16),

    /// The service returned no audio bytes.
    #[error("synthesis service returned empty audio")]
    EmptyAudio,
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Synthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for text-to-speech synthesis.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Synthesizer>`).
///
/// # Arguments
/// * `text` – Text to speak (already in the target language).
/// * `lang` – ISO-639-1-like code of the language the text is in.
///
/// Returns the synthesized audio as an encoded byte stream (MP3 for the
/// production implementation).
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, TtsError>;
}
