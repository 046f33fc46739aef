//! Speech-to-text collaborator.
//!
//! [`Transcriber`] is the object-safe interface the pipeline depends on;
//! [`WhisperTranscriber`] is the production implementation wrapping a
//! `whisper_rs::WhisperContext`.  The engine is explicitly constructed and
//! owned by the caller — there is no process-wide model singleton — so its
//! lifecycle is `load → use across one or more runs → drop`.
//!
//! Failures are structured [`SttError`] values.  Nothing downstream inspects
//! transcript text to detect failure, so a transcript that happens to contain
//! the words "Transcription Error" is just a transcript.

use std::path::Path;

use thiserror::Error;

pub mod whisper;

pub use whisper::{TranscribeParams, WhisperTranscriber};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the transcription subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The audio artifact to transcribe does not exist.
    #[error("audio file not found: {0}")]
    AudioNotFound(String),

    /// The audio artifact could not be decoded.
    #[error("failed to decode audio file: {0}")]
    AudioDecode(String),

    /// `whisper_rs` failed to initialise a context or per-call state.
    #[error("whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// An error occurred during the inference pass.
    #[error("transcription failed: {0}")]
    Transcription(String),
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-to-text engines.
///
/// # Contract
///
/// `audio_path` must point to a 16-bit PCM mono WAV artifact at the rate the
/// engine expects (16 kHz for Whisper).  A missing artifact yields
/// [`SttError::AudioNotFound`]; success yields the UTF-8 transcript, trimmed.
pub trait Transcriber: Send + Sync {
    /// Transcribe the artifact at `audio_path` and return the transcript.
    fn transcribe(&self, audio_path: &Path) -> Result<String, SttError>;
}

// Compile-time assertion: Box<dyn Transcriber> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Transcriber>) {}
};

// ---------------------------------------------------------------------------
// MockTranscriber  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without loading a
/// model file.
#[cfg(test)]
pub struct MockTranscriber {
    response: Result<String, SttError>,
}

#[cfg(test)]
impl MockTranscriber {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
impl Transcriber for MockTranscriber {
    fn transcribe(&self, _audio_path: &Path) -> Result<String, SttError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
