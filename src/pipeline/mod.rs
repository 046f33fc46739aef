//! Voice-translation pipeline.
//!
//! One run takes an utterance from the microphone to a translated MP3:
//!
//! ```text
//! Recording → Encoding → Transcribing → AwaitingTargetLanguage
//!           → Translating → Synthesizing → Complete | Failed
//! ```
//!
//! [`Pipeline`] owns the collaborators and the state machine; the
//! [`LanguagePrompt`] seam keeps the interactive suspension testable.

pub mod runner;
pub mod state;

pub use runner::{LanguagePrompt, Pipeline, PipelineError, PipelineReport, StdinPrompt};
pub use state::PipelineState;
