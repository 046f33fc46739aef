//! Single-shot pipeline orchestrator.
//!
//! [`Pipeline::run`] drives one utterance end-to-end: capture until trailing
//! silence, persist the WAV artifact, transcribe, suspend for the target
//! language, translate, synthesize, persist the MP3 artifact.  Stages run
//! strictly in order and every failure short-circuits — a stage whose
//! predecessor failed is never invoked.
//!
//! Failure is carried by [`PipelineError`] values, one variant per stage.
//! Transcript text is never inspected to detect failure, so a transcript that
//! reads "Transcription Error" flows through like any other.

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::{
    capture_until_silence, encode_wav, persist, CaptureError, CaptureOutcome, EncodeError,
    FrameSource,
};
use crate::config::AppConfig;
use crate::stt::{SttError, Transcriber};
use crate::translate::{TranslateError, Translator};
use crate::tts::{Synthesizer, TtsError};

use super::state::PipelineState;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// One variant per pipeline stage, so callers can tell which stage failed
/// without parsing message strings.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The capture session ended without a single voiced frame.  Terminal:
    /// nothing is persisted and no downstream stage runs.
    #[error("no speech detected; nothing to translate")]
    NoSpeech,

    /// The capture device failed mid-session.
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    /// The WAV artifact could not be encoded or persisted.
    #[error("failed to persist capture artifact: {0}")]
    Encode(#[from] EncodeError),

    /// The transcription engine failed.
    #[error("transcription failed: {0}")]
    Transcription(#[from] SttError),

    /// The target-language prompt failed or produced no usable code.
    #[error("target language prompt failed: {0}")]
    Prompt(String),

    /// The translation service failed.
    #[error("translation failed: {0}")]
    Translation(#[from] TranslateError),

    /// The speech-synthesis service failed.
    #[error("synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    /// The synthesized audio artifact could not be persisted.
    #[error("failed to persist synthesized audio: {0}")]
    SynthesisWrite(EncodeError),

    /// A blocking task could not be joined (panic or runtime shutdown).
    #[error("internal task failure: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// LanguagePrompt
// ---------------------------------------------------------------------------

/// Supplies the target language code while the pipeline is suspended in
/// [`PipelineState::AwaitingTargetLanguage`].
///
/// The production implementation is [`StdinPrompt`]; tests script the answer.
pub trait LanguagePrompt {
    /// Ask for an ISO-639-1-like target language code.
    fn target_language(&mut self) -> io::Result<String>;
}

/// Reads the target language from standard input.
pub struct StdinPrompt;

impl LanguagePrompt for StdinPrompt {
    fn target_language(&mut self) -> io::Result<String> {
        print!("Enter target language code (e.g. 'hi' for Hindi): ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// PipelineReport
// ---------------------------------------------------------------------------

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Transcript of the captured utterance.
    pub transcript: String,
    /// Target language code the user supplied.
    pub target_lang: String,
    /// Translated text sent to synthesis.
    pub translated: String,
    /// Where the captured WAV was written.
    pub capture_path: PathBuf,
    /// Where the synthesized MP3 was written.
    pub synthesis_path: PathBuf,
    /// Number of mono samples in the captured waveform.
    pub captured_samples: usize,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Owns the three collaborators and the run state for one session.
///
/// Collaborators are `Arc<dyn …>` so the same engine (the Whisper context in
/// particular, which is expensive to load) can be reused across runs, and so
/// transcription can move to the blocking thread pool.
pub struct Pipeline {
    config: AppConfig,
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn Synthesizer>,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(
        config: AppConfig,
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            config,
            transcriber,
            translator,
            synthesizer,
            state: PipelineState::Idle,
        }
    }

    /// Current state; terminal after [`Pipeline::run`] returns.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run one utterance end-to-end.
    ///
    /// `source` delivers capture frames (the device session in production,
    /// scripted frames in tests) and is consumed: it is dropped as soon as
    /// recording stops, so the input device is held for exactly the capture
    /// stage and no longer.  `prompt` supplies the target language once the
    /// transcript is ready.
    ///
    /// # Errors
    ///
    /// The [`PipelineError`] variant of the first stage that failed.  On any
    /// error the pipeline ends in [`PipelineState::Failed`] and no later
    /// stage has run.
    pub async fn run<S: FrameSource>(
        &mut self,
        source: S,
        prompt: &mut dyn LanguagePrompt,
    ) -> Result<PipelineReport, PipelineError> {
        match self.run_stages(source, prompt).await {
            Ok(report) => {
                self.state = PipelineState::Complete;
                log::info!("pipeline: {}", self.state.label());
                Ok(report)
            }
            Err(e) => {
                self.state = PipelineState::Failed;
                log::error!("pipeline failed: {e}");
                Err(e)
            }
        }
    }

    async fn run_stages<S: FrameSource>(
        &mut self,
        mut source: S,
        prompt: &mut dyn LanguagePrompt,
    ) -> Result<PipelineReport, PipelineError> {
        // -- Capture ---------------------------------------------------------
        self.advance(PipelineState::Recording);
        let params = self.config.audio.capture_params();
        let outcome = capture_until_silence(&mut source, &params);
        // The device stream lives exactly as long as the recording; every
        // downstream stage runs with the source already released.
        drop(source);

        let (samples, sample_rate) = match outcome? {
            CaptureOutcome::Speech {
                samples,
                sample_rate,
            } => (samples, sample_rate),
            CaptureOutcome::NoSpeech => return Err(PipelineError::NoSpeech),
        };

        // -- Encode + persist --------------------------------------------------
        self.advance(PipelineState::Encoding);
        let capture_path = PathBuf::from(&self.config.output.capture_file);
        let bytes = encode_wav(&samples, sample_rate)?;
        persist(&bytes, &capture_path)?;

        // -- Transcribe --------------------------------------------------------
        self.advance(PipelineState::Transcribing);
        let transcript = self.transcribe_blocking(&capture_path).await?;
        log::info!("transcript: {transcript:?}");

        // -- Target language ---------------------------------------------------
        self.advance(PipelineState::AwaitingTargetLanguage);
        let target_lang = prompt
            .target_language()
            .map_err(|e| PipelineError::Prompt(e.to_string()))?;
        if target_lang.is_empty() {
            return Err(PipelineError::Prompt("empty target language code".into()));
        }

        // -- Translate ---------------------------------------------------------
        self.advance(PipelineState::Translating);
        let translated = self.translator.translate(&transcript, &target_lang).await?;
        log::info!("translated ({target_lang}): {translated:?}");

        // -- Synthesize + persist -----------------------------------------------
        self.advance(PipelineState::Synthesizing);
        let audio = self.synthesizer.synthesize(&translated, &target_lang).await?;
        let synthesis_path = PathBuf::from(&self.config.output.synthesis_file);
        persist(&audio, &synthesis_path).map_err(PipelineError::SynthesisWrite)?;

        Ok(PipelineReport {
            transcript,
            target_lang,
            translated,
            capture_path,
            synthesis_path,
            captured_samples: samples.len(),
        })
    }

    /// Whisper inference is CPU-bound and synchronous; run it on the
    /// blocking thread pool so the runtime stays responsive.
    async fn transcribe_blocking(&self, audio_path: &Path) -> Result<String, PipelineError> {
        let transcriber = Arc::clone(&self.transcriber);
        let path = audio_path.to_path_buf();

        let transcript = tokio::task::spawn_blocking(move || transcriber.transcribe(&path))
            .await
            .map_err(|e| PipelineError::Internal(e.to_string()))??;

        Ok(transcript)
    }

    fn advance(&mut self, next: PipelineState) {
        log::info!("pipeline: {}", next.label());
        self.state = next;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
