//! Pipeline state machine.
//!
//! [`PipelineState`] tracks the single-shot voice-translation run.  The
//! interactive language prompt is modelled as an explicit
//! [`PipelineState::AwaitingTargetLanguage`] suspension point rather than a
//! hidden blocking read, so the orchestrator can be driven and observed in
//! tests without a terminal.

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the voice-translation pipeline.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──run()──▶ Recording ──▶ Encoding ──▶ Transcribing
///                 ──▶ AwaitingTargetLanguage ──▶ Translating
///                 ──▶ Synthesizing ──▶ Complete
/// any stage ──error──▶ Failed   (later stages never run)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No run has started yet.
    Idle,

    /// The capture session is active; frames are being read until the
    /// trailing-silence condition fires.
    Recording,

    /// The waveform is being encoded and persisted as the WAV artifact.
    Encoding,

    /// Whisper is running on the blocking thread pool.
    Transcribing,

    /// Suspended: the run cannot proceed until the user supplies a target
    /// language code.
    AwaitingTargetLanguage,

    /// The translation service call is in flight.
    Translating,

    /// The speech-synthesis service call is in flight.
    Synthesizing,

    /// The run finished; the synthesized artifact is on disk.
    Complete,

    /// A stage failed; everything after it was skipped.
    Failed,
}

impl PipelineState {
    /// Returns `true` while a stage is actively doing work.  The suspension
    /// state is not busy — the pipeline is waiting on the user.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PipelineState::Recording
                | PipelineState::Encoding
                | PipelineState::Transcribing
                | PipelineState::Translating
                | PipelineState::Synthesizing
        )
    }

    /// Returns `true` for the two states a run can end in.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed)
    }

    /// A short human-readable label suitable for progress messages.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Recording => "Recording",
            PipelineState::Encoding => "Encoding",
            PipelineState::Transcribing => "Transcribing",
            PipelineState::AwaitingTargetLanguage => "Awaiting target language",
            PipelineState::Translating => "Translating",
            PipelineState::Synthesizing => "Synthesizing",
            PipelineState::Complete => "Done",
            PipelineState::Failed => "Failed",
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        PipelineState::Idle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
