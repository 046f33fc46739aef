//! Microphone capture via `cpal`.
//!
//! [`AudioCapture`] wraps the cpal host/device/stream lifecycle.  Call
//! [`AudioCapture::open_session`] to start streaming and obtain a
//! [`DeviceFrames`] source for one capture session.  The stream is held by an
//! RAII [`StreamHandle`] inside the source, so the device is released as soon
//! as the session value is dropped — including on error or early stop.
//!
//! Device buffers arrive in whatever size and channel layout the hardware
//! prefers; [`ChannelFrames`] downmixes to mono, resamples to the configured
//! rate, and re-chunks into exact frame-length [`AudioFrame`]s.

use std::sync::mpsc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use super::frame::{AudioFrame, FrameAssembler};
use super::resample::{downmix_to_mono, resample};
use super::silence::{CaptureParams, FrameSource};

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running a capture session.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture parameters must all be positive")]
    InvalidParams,

    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// The device reported a runtime failure mid-session.
    #[error("audio stream failed: {0}")]
    Stream(String),

    /// The audio thread went away without reporting a failure.
    #[error("audio stream disconnected")]
    Disconnected,

    /// No frame arrived within `max_wait_per_frame`.
    #[error("no audio frame within {0:?}")]
    FrameTimeout(Duration),
}

// ---------------------------------------------------------------------------
// StreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.  Dropping it stops the
/// underlying hardware stream.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// ChannelFrames
// ---------------------------------------------------------------------------

/// [`FrameSource`] over an mpsc channel of raw device buffers.
///
/// The sending side delivers `Ok(samples)` for each hardware buffer and
/// `Err(description)` when the stream fails.  Kept separate from the cpal
/// stream so the conversion and timeout logic is testable without hardware.
pub struct ChannelFrames {
    rx: mpsc::Receiver<Result<Vec<f32>, String>>,
    assembler: FrameAssembler,
    /// Interleaved channel count of the raw buffers.
    channels: u16,
    /// Native sample rate of the raw buffers in Hz.
    native_rate: u32,
    /// Sample rate the session was configured for.
    target_rate: u32,
    max_wait: Option<Duration>,
}

impl ChannelFrames {
    /// Build a source that converts raw `channels`-channel buffers at
    /// `native_rate` Hz into mono frames of `params.frame_len()` samples at
    /// `params.sample_rate` Hz.
    pub fn new(
        rx: mpsc::Receiver<Result<Vec<f32>, String>>,
        channels: u16,
        native_rate: u32,
        params: &CaptureParams,
    ) -> Self {
        Self {
            rx,
            assembler: FrameAssembler::new(params.frame_len()),
            channels,
            native_rate,
            target_rate: params.sample_rate,
            max_wait: params.max_wait_per_frame,
        }
    }

    fn recv_buffer(&mut self) -> Result<Vec<f32>, CaptureError> {
        let received = match self.max_wait {
            Some(wait) => self.rx.recv_timeout(wait).map_err(|e| match e {
                mpsc::RecvTimeoutError::Timeout => CaptureError::FrameTimeout(wait),
                mpsc::RecvTimeoutError::Disconnected => CaptureError::Disconnected,
            })?,
            None => self.rx.recv().map_err(|_| CaptureError::Disconnected)?,
        };
        received.map_err(CaptureError::Stream)
    }
}

impl FrameSource for ChannelFrames {
    fn next_frame(&mut self) -> Result<AudioFrame, CaptureError> {
        loop {
            if let Some(frame) = self.assembler.next_frame() {
                return Ok(frame);
            }

            let raw = self.recv_buffer()?;
            let mono = downmix_to_mono(&raw, self.channels);
            let converted = resample(&mono, self.native_rate, self.target_rate);
            self.assembler.push(&converted);
        }
    }
}

// ---------------------------------------------------------------------------
// DeviceFrames
// ---------------------------------------------------------------------------

/// A live capture session: the cpal stream plus the frame conversion source.
///
/// Owns the device stream exclusively; dropping the session stops the stream.
pub struct DeviceFrames {
    _handle: StreamHandle,
    inner: ChannelFrames,
}

impl FrameSource for DeviceFrames {
    fn next_frame(&mut self) -> Result<AudioFrame, CaptureError> {
        self.inner.next_frame()
    }
}

// ---------------------------------------------------------------------------
// AudioCapture
// ---------------------------------------------------------------------------

/// Microphone capture device wrapper built on top of `cpal`.
///
/// # Example
///
/// ```rust,no_run
/// use voice_translate::audio::{capture_until_silence, AudioCapture, CaptureParams};
///
/// let params = CaptureParams::default();
/// let capture = AudioCapture::new().unwrap();
/// let mut session = capture.open_session(&params).unwrap();
/// let outcome = capture_until_silence(&mut session, &params).unwrap();
/// drop(session); // device released
/// # let _ = outcome;
/// ```
pub struct AudioCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    /// Native sample rate reported by the device (Hz).
    sample_rate: u32,
    /// Number of interleaved channels reported by the device.
    channels: u16,
}

impl AudioCapture {
    /// Create a new [`AudioCapture`] using the system default input device
    /// and its preferred stream configuration.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoDevice`] when no input device is available, or
    /// [`CaptureError::DefaultConfig`] when the device cannot report a
    /// default stream configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start the input stream and return a [`DeviceFrames`] source for one
    /// capture session.
    ///
    /// The cpal callback runs on a dedicated audio thread; each hardware
    /// buffer is forwarded over a channel and converted lazily on the
    /// reading side.  Stream errors are forwarded over the same channel so
    /// the session's next read fails with [`CaptureError::Stream`].
    ///
    /// # Errors
    ///
    /// [`CaptureError::BuildStream`] or [`CaptureError::PlayStream`] if the
    /// platform rejects the stream configuration.
    pub fn open_session(&self, params: &CaptureParams) -> Result<DeviceFrames, CaptureError> {
        params.validate()?;

        let (tx, rx) = mpsc::channel::<Result<Vec<f32>, String>>();
        let err_tx = tx.clone();

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Send errors mean the session ended; the audio thread must
                // never panic over them.
                let _ = tx.send(Ok(data.to_vec()));
            },
            move |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
                let _ = err_tx.send(Err(err.to_string()));
            },
            None, // no cpal-level timeout; frame waits are handled per-read
        )?;

        stream.play()?;

        log::info!(
            "capture session opened ({} Hz, {} ch → {} Hz mono, {}-sample frames)",
            self.sample_rate,
            self.channels,
            params.sample_rate,
            params.frame_len()
        );

        Ok(DeviceFrames {
            _handle: StreamHandle { _stream: stream },
            inner: ChannelFrames::new(rx, self.channels, self.sample_rate, params),
        })
    }

    /// Native sample rate of the capture device in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels the device delivers.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
