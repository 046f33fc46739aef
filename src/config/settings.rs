//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for audio capture and endpoint detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Capture sample rate in Hz.
    pub sample_rate: u32,
    /// L2-norm energy threshold; frames below it count as silence.
    pub silence_threshold: f32,
    /// Trailing silence in seconds that ends the recording.
    pub silence_duration_secs: f32,
    /// Frame granularity in seconds.
    pub chunk_duration_secs: f32,
    /// Optional per-frame read timeout in seconds; `None` blocks until the
    /// device delivers a frame or fails.
    pub max_wait_per_frame_secs: Option<f32>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            silence_threshold: 0.02,
            silence_duration_secs: 1.0,
            chunk_duration_secs: 0.2,
            max_wait_per_frame_secs: None,
        }
    }
}

impl AudioConfig {
    /// Convert to the capture module's parameter struct.
    pub fn capture_params(&self) -> crate::audio::CaptureParams {
        crate::audio::CaptureParams {
            sample_rate: self.sample_rate,
            silence_threshold: self.silence_threshold,
            silence_duration_secs: self.silence_duration_secs,
            chunk_duration_secs: self.chunk_duration_secs,
            max_wait_per_frame: self
                .max_wait_per_frame_secs
                .map(std::time::Duration::from_secs_f32),
        }
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper transcription engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SttConfig {
    /// GGML model name / file stem (e.g. `"ggml-base"`).
    pub model: String,
    /// Source speech language as an ISO-639-1 code, or `"auto"` for
    /// Whisper's built-in language detection.
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "ggml-base".into(),
            language: "en".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TranslateConfig
// ---------------------------------------------------------------------------

/// Settings for the HTTP translation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Base URL of a LibreTranslate-compatible endpoint.
    pub base_url: String,
    /// API key — `None` for self-hosted instances that require none.
    pub api_key: Option<String>,
    /// Maximum seconds to wait for a translation response.
    pub timeout_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            api_key: None,
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the HTTP speech-synthesis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Base URL of the synthesis endpoint.
    pub base_url: String,
    /// Maximum seconds to wait for synthesized audio.
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com/translate_tts".into(),
            timeout_secs: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// File names for the session's audio artifacts, resolved relative to the
/// current working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Captured utterance (16-bit PCM WAV).
    pub capture_file: String,
    /// Synthesized translation (MP3).
    pub synthesis_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            capture_file: "user_audio.wav".into(),
            synthesis_file: "translated_audio.mp3".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voice_translate::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Audio capture / endpoint-detection settings.
    pub audio: AudioConfig,
    /// Transcription engine settings.
    pub stt: SttConfig,
    /// Translation service settings.
    pub translate: TranslateConfig,
    /// Speech-synthesis service settings.
    pub tts: TtsConfig,
    /// Artifact file names.
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// A default `AppConfig` must survive a TOML round trip unchanged.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(original, loaded);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    /// Defaults mirror the capture constants the recorder was designed with.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.audio.sample_rate, 16_000);
        assert_eq!(cfg.audio.silence_threshold, 0.02);
        assert_eq!(cfg.audio.silence_duration_secs, 1.0);
        assert_eq!(cfg.audio.chunk_duration_secs, 0.2);
        assert!(cfg.audio.max_wait_per_frame_secs.is_none());
        assert_eq!(cfg.stt.language, "en");
        assert_eq!(cfg.translate.timeout_secs, 15);
        assert!(cfg.translate.api_key.is_none());
        assert_eq!(cfg.output.capture_file, "user_audio.wav");
        assert_eq!(cfg.output.synthesis_file, "translated_audio.mp3");
    }

    /// Modified non-default values must survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.audio.silence_threshold = 0.05;
        cfg.audio.max_wait_per_frame_secs = Some(2.5);
        cfg.stt.language = "auto".into();
        cfg.translate.base_url = "https://libretranslate.example".into();
        cfg.translate.api_key = Some("key-123".into());
        cfg.tts.timeout_secs = 5;
        cfg.output.capture_file = "take-2.wav".into();

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg, loaded);
    }

    /// The derived capture parameters reproduce the design scenario.
    #[test]
    fn capture_params_from_config() {
        let cfg = AudioConfig::default();
        let params = cfg.capture_params();

        assert_eq!(params.frame_len(), 3_200);
        assert_eq!(params.required_silent_frames(), 5);
        assert!(params.max_wait_per_frame.is_none());

        let timed = AudioConfig {
            max_wait_per_frame_secs: Some(2.0),
            ..AudioConfig::default()
        };
        assert_eq!(
            timed.capture_params().max_wait_per_frame,
            Some(std::time::Duration::from_secs(2))
        );
    }
}
