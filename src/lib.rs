//! Voice-to-voice translation pipeline.
//!
//! Captures one spoken utterance from the default input device, stopping
//! automatically after a configured run of trailing silence, then drives the
//! utterance through transcription → translation → speech synthesis.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → capture_until_silence → 16-bit PCM WAV artifact
//!           → Transcriber (Whisper)  → text
//!           → LanguagePrompt          → target language code
//!           → Translator (HTTP)      → translated text
//!           → Synthesizer (HTTP)     → MP3 artifact
//! ```
//!
//! Each stage short-circuits the rest on failure; one invocation processes
//! exactly one utterance into exactly one target language.

pub mod audio;
pub mod config;
pub mod pipeline;
pub mod stt;
pub mod translate;
pub mod tts;
