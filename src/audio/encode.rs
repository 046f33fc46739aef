//! 16-bit PCM WAV encoding and persistence via `hound`.
//!
//! The capture waveform is `f32` in `[-1.0, 1.0]`; the transcription engine
//! and the on-disk artifact both want 16-bit integer PCM.  [`encode_wav`]
//! produces the container in memory, [`persist`] writes it to disk with a
//! post-write existence check, and [`decode_wav`] reads an artifact back to
//! `f32` samples.

use std::io::Cursor;
use std::path::Path;

use thiserror::Error;

/// Scale factor between `f32` samples in `[-1.0, 1.0]` and `i16` PCM.
const PCM_SCALE: f32 = 32_767.0;

// ---------------------------------------------------------------------------
// EncodeError
// ---------------------------------------------------------------------------

/// Errors from encoding or persisting the WAV artifact.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// `hound` rejected the stream while writing samples.
    #[error("WAV encoding failed: {0}")]
    Encode(#[from] hound::Error),

    /// The target path could not be created or written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    /// The artifact is missing or empty after the write completed.  Writes
    /// are not transactional; a crash mid-write can leave a truncated file,
    /// so callers re-check instead of trusting the write.
    #[error("artifact missing or empty after write: {0}")]
    NotPersisted(String),
}

// ---------------------------------------------------------------------------
// encode_wav
// ---------------------------------------------------------------------------

/// Encode mono `f32` samples as a 16-bit PCM WAV container in memory.
///
/// Each sample is scaled by 32 767 and rounded to the nearest integer.
/// Inputs are assumed to be in `[-1.0, 1.0]`; out-of-range samples are
/// clamped to the `i16` range rather than guarded against.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, EncodeError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            let scaled = (sample * PCM_SCALE).round();
            writer.write_sample(scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// persist
// ---------------------------------------------------------------------------

/// Write `bytes` to `path`, then verify the artifact exists and is non-empty.
///
/// # Errors
///
/// [`EncodeError::Write`] when the path cannot be created or written;
/// [`EncodeError::NotPersisted`] when the post-write check fails.
pub fn persist(bytes: &[u8], path: &Path) -> Result<(), EncodeError> {
    std::fs::write(path, bytes).map_err(|source| EncodeError::Write {
        path: path.display().to_string(),
        source,
    })?;

    let ok = std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    if !ok {
        return Err(EncodeError::NotPersisted(path.display().to_string()));
    }

    log::info!(
        "saved audio to {} ({} bytes)",
        path.display(),
        bytes.len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// decode_wav
// ---------------------------------------------------------------------------

/// Read a 16-bit PCM WAV artifact back to mono `f32` samples in `[-1.0, 1.0]`
/// and its sample rate.
pub fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32), EncodeError> {
    let mut reader = hound::WavReader::open(path)?;
    let sample_rate = reader.spec().sample_rate;

    let samples = reader
        .samples::<i16>()
        .map(|s| s.map(|v| v as f32 / PCM_SCALE))
        .collect::<Result<Vec<f32>, hound::Error>>()?;

    Ok((samples, sample_rate))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // ---- Round-trip properties -------------------------------------------------

    /// Silence is lossless: N zeros in, N zeros out.
    #[test]
    fn zero_waveform_round_trips_exactly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("silence.wav");

        let samples = vec![0.0_f32; 4_000];
        let bytes = encode_wav(&samples, 16_000).unwrap();
        persist(&bytes, &path).unwrap();

        let (decoded, rate) = decode_wav(&path).unwrap();
        assert_eq!(rate, 16_000);
        assert_eq!(decoded.len(), 4_000);
        assert!(decoded.iter().all(|&s| s == 0.0));
    }

    /// Values in [-1, 1] reproduce within 1/32767 absolute error.
    #[test]
    fn known_values_round_trip_within_quantization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tones.wav");

        let samples: Vec<f32> = vec![-1.0, -0.5, -0.1, 0.0, 0.1, 0.25, 0.5, 0.999, 1.0];
        let bytes = encode_wav(&samples, 16_000).unwrap();
        persist(&bytes, &path).unwrap();

        let (decoded, _) = decode_wav(&path).unwrap();
        assert_eq!(decoded.len(), samples.len());
        for (orig, dec) in samples.iter().zip(decoded.iter()) {
            assert!(
                (orig - dec).abs() <= 1.0 / PCM_SCALE,
                "sample {orig} decoded as {dec}"
            );
        }
    }

    #[test]
    fn sample_rate_is_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rate.wav");

        let bytes = encode_wav(&[0.1, 0.2], 44_100).unwrap();
        persist(&bytes, &path).unwrap();

        let (_, rate) = decode_wav(&path).unwrap();
        assert_eq!(rate, 44_100);
    }

    // ---- Scaling ----------------------------------------------------------------

    #[test]
    fn full_scale_maps_to_i16_extremes() {
        let bytes = encode_wav(&[1.0, -1.0], 16_000).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let pcm: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(pcm, vec![32_767, -32_767]);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        // Out-of-range input is documented as unsupported; it must still not
        // wrap around into the opposite sign.
        let bytes = encode_wav(&[2.0, -2.0], 16_000).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let pcm: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(pcm[0], i16::MAX);
        assert_eq!(pcm[1], i16::MIN);
    }

    // ---- persist -------------------------------------------------------------------

    #[test]
    fn persist_to_unwritable_path_fails_with_write_error() {
        let bytes = encode_wav(&[0.1], 16_000).unwrap();
        let err = persist(&bytes, Path::new("/nonexistent-dir/out.wav")).unwrap_err();
        assert!(matches!(err, EncodeError::Write { .. }), "{err}");
    }

    #[test]
    fn persist_checks_artifact_is_non_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.wav");

        let err = persist(&[], &path).unwrap_err();
        assert!(matches!(err, EncodeError::NotPersisted(_)), "{err}");
    }

    #[test]
    fn decode_missing_file_errors() {
        assert!(decode_wav(Path::new("/no/such/file.wav")).is_err());
    }
}
