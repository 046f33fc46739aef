//! Endpoint detection — capture frames until trailing silence.
//!
//! [`capture_until_silence`] is the heart of the recorder: it pulls
//! fixed-length [`AudioFrame`]s from a [`FrameSource`], classifies each one
//! as silent or voiced by its L2 norm, and stops once an unbroken run of
//! silent frames reaches the configured duration.
//!
//! ## Algorithm
//!
//! Classification is frame-local: a frame is silent when its L2 norm is
//! below `silence_threshold`.  [`SilenceTracker`] counts consecutive silent
//! frames and resets to zero on any voiced frame — no smoothing or hangover,
//! so a single loud frame restarts the countdown.  False restarts from
//! transient noise are accepted in exchange for a stateless-per-frame
//! classifier.
//!
//! There is no maximum-duration cap and no minimum-speech requirement: a
//! session where the user never speaks still terminates once the silent run
//! accumulates, and is reported as [`CaptureOutcome::NoSpeech`].

use std::time::Duration;

use super::capture::CaptureError;
use super::frame::AudioFrame;

// ---------------------------------------------------------------------------
// CaptureParams
// ---------------------------------------------------------------------------

/// Parameters for one capture session.
///
/// All fields must be positive; [`CaptureParams::validate`] enforces this
/// before a session starts.
#[derive(Debug, Clone)]
pub struct CaptureParams {
    /// Sample rate of the captured frames in Hz.
    pub sample_rate: u32,
    /// Energy threshold on the L2 norm of a frame; frames below it are
    /// classified as silent.
    pub silence_threshold: f32,
    /// Trailing silence, in seconds, that ends the recording.
    pub silence_duration_secs: f32,
    /// Frame granularity in seconds; the frame length in samples is
    /// `round(sample_rate × chunk_duration_secs)`.
    pub chunk_duration_secs: f32,
    /// Optional upper bound on how long a single frame read may block.
    /// `None` blocks indefinitely, matching a device that only terminates a
    /// read by failing.
    pub max_wait_per_frame: Option<Duration>,
}

impl Default for CaptureParams {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            silence_threshold: 0.02,
            silence_duration_secs: 1.0,
            chunk_duration_secs: 0.2,
            max_wait_per_frame: None,
        }
    }
}

impl CaptureParams {
    /// Frame length in samples: `round(sample_rate × chunk_duration_secs)`.
    pub fn frame_len(&self) -> usize {
        (self.sample_rate as f64 * self.chunk_duration_secs as f64).round() as usize
    }

    /// Number of consecutive silent frames that stops the recording:
    /// `round(silence_duration_secs / chunk_duration_secs)`, at least 1.
    pub fn required_silent_frames(&self) -> u32 {
        let frames =
            (self.silence_duration_secs as f64 / self.chunk_duration_secs as f64).round() as u32;
        frames.max(1)
    }

    /// Check that every parameter is positive and that the derived frame
    /// length is at least one sample.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.sample_rate == 0
            || self.silence_threshold <= 0.0
            || self.silence_duration_secs <= 0.0
            || self.chunk_duration_secs <= 0.0
        {
            return Err(CaptureError::InvalidParams);
        }
        // A chunk shorter than half a sample period rounds to a zero-length
        // frame, which no source can deliver.
        if self.frame_len() == 0 {
            return Err(CaptureError::InvalidParams);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SilenceTracker
// ---------------------------------------------------------------------------

/// Counts consecutive silent frames and remembers whether any voiced frame
/// was ever observed.  Created at capture start, discarded when it stops.
#[derive(Debug)]
pub struct SilenceTracker {
    threshold: f32,
    required: u32,
    consecutive_silent: u32,
    voiced_seen: bool,
}

impl SilenceTracker {
    /// Create a tracker that trips after `required` consecutive frames with
    /// an L2 norm below `threshold`.
    pub fn new(threshold: f32, required: u32) -> Self {
        Self {
            threshold,
            required,
            consecutive_silent: 0,
            voiced_seen: false,
        }
    }

    /// Observe one frame.  Returns `true` when the trailing silent run has
    /// reached the required length and the recording should stop.
    pub fn observe(&mut self, frame: &AudioFrame) -> bool {
        if frame.l2_norm() < self.threshold {
            self.consecutive_silent += 1;
        } else {
            self.consecutive_silent = 0;
            self.voiced_seen = true;
        }
        self.consecutive_silent >= self.required
    }

    /// Current unbroken run of silent frames.
    pub fn consecutive_silent(&self) -> u32 {
        self.consecutive_silent
    }

    /// Returns `true` when at least one frame crossed the threshold during
    /// this session.
    pub fn voiced_seen(&self) -> bool {
        self.voiced_seen
    }
}

// ---------------------------------------------------------------------------
// FrameSource
// ---------------------------------------------------------------------------

/// The capture loop's only dependency on the audio device: read the next
/// frame or fail.
///
/// The production implementation is [`DeviceFrames`] backed by a cpal
/// stream; tests drive the state machine with scripted frames.
///
/// [`DeviceFrames`]: super::capture::DeviceFrames
pub trait FrameSource {
    /// Block until a full frame is available, or return the device failure
    /// that terminated the read.
    fn next_frame(&mut self) -> Result<AudioFrame, CaptureError>;
}

// ---------------------------------------------------------------------------
// CaptureOutcome
// ---------------------------------------------------------------------------

/// Terminal result of a successful (non-erroring) capture session.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// At least one frame crossed the silence threshold.  `samples` holds
    /// every frame read, in order, including the trailing silent run.
    Speech {
        samples: Vec<f32>,
        sample_rate: u32,
    },
    /// The session ended without a single voiced frame.  Not an error; the
    /// caller should skip the rest of the pipeline.
    NoSpeech,
}

/// Internal state of the capture loop.  `Recording` is the only state in
/// which frames are read; the two stopped states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Recording,
    StoppedBySilence,
    StoppedByError,
}

// ---------------------------------------------------------------------------
// capture_until_silence
// ---------------------------------------------------------------------------

/// Read frames from `source` until the trailing silence condition fires.
///
/// Every successfully read frame is appended to the buffer before it is
/// classified, so the returned waveform contains exactly the frames read up
/// to and including the stopping frame.  A device read failure terminates
/// the session immediately; no partial buffer is returned and the session
/// cannot be resumed.
///
/// # Errors
///
/// [`CaptureError::InvalidParams`] when a parameter is non-positive, or the
/// underlying device error when a frame read fails.
pub fn capture_until_silence<S: FrameSource>(
    source: &mut S,
    params: &CaptureParams,
) -> Result<CaptureOutcome, CaptureError> {
    params.validate()?;

    let mut tracker =
        SilenceTracker::new(params.silence_threshold, params.required_silent_frames());
    let mut buffer: Vec<f32> = Vec::new();
    let mut state = CaptureState::Recording;

    while state == CaptureState::Recording {
        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                // StoppedByError: the partial buffer is discarded.
                log::error!(
                    "capture: device read failed after {} samples: {e}",
                    buffer.len()
                );
                return Err(e);
            }
        };

        buffer.extend_from_slice(frame.samples());

        if tracker.observe(&frame) {
            state = CaptureState::StoppedBySilence;
        }
    }

    if !tracker.voiced_seen() || buffer.is_empty() {
        log::warn!("capture: no speech detected ({} samples of silence)", buffer.len());
        return Ok(CaptureOutcome::NoSpeech);
    }

    log::info!(
        "capture: stopped by silence after {} samples ({:.2}s)",
        buffer.len(),
        buffer.len() as f32 / params.sample_rate as f32
    );

    Ok(CaptureOutcome::Speech {
        samples: buffer,
        sample_rate: params.sample_rate,
    })
}

// ---------------------------------------------------------------------------
// ScriptedFrames (test-only)
// ---------------------------------------------------------------------------

/// A [`FrameSource`] that replays a fixed script of frame reads — used to
/// test the capture state machine without an input device.
#[cfg(test)]
pub struct ScriptedFrames {
    script: std::collections::VecDeque<Result<AudioFrame, CaptureError>>,
}

#[cfg(test)]
impl ScriptedFrames {
    pub fn new(script: Vec<Result<AudioFrame, CaptureError>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// Frames of constant amplitude: `norms` gives the per-frame amplitude
    /// of the first sample; remaining samples are zero, so the L2 norm of
    /// each frame equals that amplitude.
    pub fn from_norms(norms: &[f32], frame_len: usize) -> Self {
        let script = norms
            .iter()
            .map(|&n| {
                let mut samples = vec![0.0_f32; frame_len];
                samples[0] = n;
                Ok(AudioFrame::new(samples))
            })
            .collect();
        Self::new(script)
    }
}

#[cfg(test)]
impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> Result<AudioFrame, CaptureError> {
        self.script
            .pop_front()
            .expect("capture loop read past the end of the frame script")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
