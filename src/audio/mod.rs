//! Audio capture pipeline — device stream → frames → endpoint detection → WAV.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → ChannelFrames (downmix + resample + re-chunk)
//!           → capture_until_silence (SilenceTracker state machine)
//!           → encode_wav → persist
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use voice_translate::audio::{
//!     capture_until_silence, encode_wav, persist, AudioCapture, CaptureOutcome, CaptureParams,
//! };
//!
//! let params = CaptureParams::default(); // 16 kHz, 0.02 threshold, 1 s of silence
//! let capture = AudioCapture::new().unwrap();
//! let mut session = capture.open_session(&params).unwrap();
//!
//! match capture_until_silence(&mut session, &params).unwrap() {
//!     CaptureOutcome::Speech { samples, sample_rate } => {
//!         let bytes = encode_wav(&samples, sample_rate).unwrap();
//!         persist(&bytes, Path::new("user_audio.wav")).unwrap();
//!     }
//!     CaptureOutcome::NoSpeech => eprintln!("no speech detected"),
//! }
//! ```

pub mod capture;
pub mod encode;
pub mod frame;
pub mod resample;
pub mod silence;

pub use capture::{AudioCapture, CaptureError, ChannelFrames, DeviceFrames, StreamHandle};
pub use encode::{decode_wav, encode_wav, persist, EncodeError};
pub use frame::{AudioFrame, FrameAssembler};
pub use resample::{downmix_to_mono, resample};
pub use silence::{
    capture_until_silence, CaptureOutcome, CaptureParams, CaptureState, FrameSource,
    SilenceTracker,
};

// test-only re-export so other modules' tests can script capture sessions
// without reaching into `silence::ScriptedFrames`.
#[cfg(test)]
pub use silence::ScriptedFrames;
