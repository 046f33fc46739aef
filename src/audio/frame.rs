//! Fixed-length audio frames and re-chunking of device buffers.
//!
//! The capture state machine consumes [`AudioFrame`]s of exactly
//! `frame_len` samples, but audio backends deliver buffers of whatever size
//! the hardware period happens to be.  [`FrameAssembler`] sits between the
//! two: feed it arbitrary slices, pull out exact-length frames.

// ---------------------------------------------------------------------------
// AudioFrame
// ---------------------------------------------------------------------------

/// A fixed-length run of single-channel `f32` samples in `[-1.0, 1.0]`,
/// captured at the configured sample rate.  Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    samples: Vec<f32>,
}

impl AudioFrame {
    /// Wrap `samples` as a frame.  The capture loop only ever constructs
    /// frames of the configured frame length; tests may use any length.
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// The frame's samples, in capture order.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of samples in the frame.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` for a zero-length frame.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Euclidean (L2) norm of the frame — the energy measure the silence
    /// classifier compares against the configured threshold.
    pub fn l2_norm(&self) -> f32 {
        self.samples
            .iter()
            .map(|s| s * s)
            .sum::<f32>()
            .sqrt()
    }
}

// ---------------------------------------------------------------------------
// FrameAssembler
// ---------------------------------------------------------------------------

/// Accumulates samples from arbitrarily-sized buffers and emits
/// [`AudioFrame`]s of exactly `frame_len` samples.
///
/// # Example
///
/// ```rust
/// use voice_translate::audio::FrameAssembler;
///
/// let mut asm = FrameAssembler::new(4);
/// asm.push(&[0.1, 0.2, 0.3]);
/// assert!(asm.next_frame().is_none()); // only 3 of 4 samples so far
///
/// asm.push(&[0.4, 0.5]);
/// let frame = asm.next_frame().unwrap();
/// assert_eq!(frame.samples(), &[0.1, 0.2, 0.3, 0.4]);
/// ```
pub struct FrameAssembler {
    frame_len: usize,
    pending: Vec<f32>,
}

impl FrameAssembler {
    /// Create an assembler producing frames of `frame_len` samples.
    ///
    /// # Panics
    ///
    /// Panics if `frame_len == 0`.
    pub fn new(frame_len: usize) -> Self {
        assert!(frame_len > 0, "frame_len must be > 0");
        Self {
            frame_len,
            pending: Vec::with_capacity(frame_len * 2),
        }
    }

    /// Append `samples` to the pending buffer.
    pub fn push(&mut self, samples: &[f32]) {
        self.pending.extend_from_slice(samples);
    }

    /// Pop the next complete frame, or `None` when fewer than `frame_len`
    /// samples are pending.  Leftover samples stay queued for the next frame.
    pub fn next_frame(&mut self) -> Option<AudioFrame> {
        if self.pending.len() < self.frame_len {
            return None;
        }
        let rest = self.pending.split_off(self.frame_len);
        let samples = std::mem::replace(&mut self.pending, rest);
        Some(AudioFrame::new(samples))
    }

    /// Number of samples waiting for the next frame boundary.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- AudioFrame::l2_norm ------------------------------------------------

    #[test]
    fn norm_of_silence_is_zero() {
        let frame = AudioFrame::new(vec![0.0; 3200]);
        assert_eq!(frame.l2_norm(), 0.0);
    }

    #[test]
    fn norm_of_unit_sample_is_one() {
        let frame = AudioFrame::new(vec![1.0]);
        assert!((frame.l2_norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn norm_of_three_four_vector() {
        // sqrt(0.3² + 0.4²) = 0.5
        let frame = AudioFrame::new(vec![0.3, 0.4]);
        assert!((frame.l2_norm() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn norm_of_empty_frame_is_zero() {
        let frame = AudioFrame::new(Vec::new());
        assert!(frame.is_empty());
        assert_eq!(frame.l2_norm(), 0.0);
    }

    // ---- FrameAssembler -----------------------------------------------------

    #[test]
    fn emits_nothing_until_full_frame() {
        let mut asm = FrameAssembler::new(4);
        asm.push(&[0.1, 0.2]);
        assert!(asm.next_frame().is_none());
        assert_eq!(asm.pending_len(), 2);
    }

    #[test]
    fn splits_large_buffer_into_frames() {
        let mut asm = FrameAssembler::new(2);
        asm.push(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(asm.next_frame().unwrap().samples(), &[1.0, 2.0]);
        assert_eq!(asm.next_frame().unwrap().samples(), &[3.0, 4.0]);
        assert!(asm.next_frame().is_none());
        assert_eq!(asm.pending_len(), 1); // 5.0 carried over
    }

    #[test]
    fn leftover_joins_next_push() {
        let mut asm = FrameAssembler::new(3);
        asm.push(&[1.0, 2.0]);
        asm.push(&[3.0, 4.0]);

        assert_eq!(asm.next_frame().unwrap().samples(), &[1.0, 2.0, 3.0]);
        assert!(asm.next_frame().is_none());
        assert_eq!(asm.pending_len(), 1);
    }

    #[test]
    fn frame_order_is_preserved() {
        let mut asm = FrameAssembler::new(2);
        for i in 0..6 {
            asm.push(&[i as f32]);
        }
        let mut out = Vec::new();
        while let Some(f) = asm.next_frame() {
            out.extend_from_slice(f.samples());
        }
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    #[should_panic(expected = "frame_len must be > 0")]
    fn zero_frame_len_panics() {
        FrameAssembler::new(0);
    }
}
