//! [`HttpSynthesizer`] — gTTS-compatible speech-synthesis client.
//!
//! Fetches MP3 audio from a `translate_tts`-style GET endpoint.  The base
//! URL comes from [`TtsConfig`] so a self-hosted mirror can be swapped in
//! without code changes.

use async_trait::async_trait;

use crate::config::TtsConfig;

use super::{Synthesizer, TtsError};

// ---------------------------------------------------------------------------
// HttpSynthesizer
// ---------------------------------------------------------------------------

/// Calls a gTTS-compatible endpoint and returns the raw MP3 bytes.
pub struct HttpSynthesizer {
    client: reqwest::Client,
    config: TtsConfig,
}

impl HttpSynthesizer {
    /// Build an `HttpSynthesizer` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &TtsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, TtsError> {
        log::info!("synthesizing {} chars ({lang})", text.len());

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[("ie", "UTF-8"), ("client", "tw-ob"), ("tl", lang), ("q", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::Service(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(TtsError::EmptyAudio);
        }

        Ok(bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> TtsConfig {
        TtsConfig {
            base_url: "http://localhost:9999/translate_tts".into(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _s = HttpSynthesizer::from_config(&make_config());
    }

    /// `HttpSynthesizer` must be usable as `dyn Synthesizer`.
    #[test]
    fn synthesizer_is_object_safe() {
        let s: Box<dyn Synthesizer> = Box::new(HttpSynthesizer::from_config(&make_config()));
        drop(s);
    }

    /// An unreachable endpoint must surface as Request or Timeout.
    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let config = TtsConfig {
            base_url: "http://127.0.0.1:1/translate_tts".into(),
            timeout_secs: 1,
        };
        let s = HttpSynthesizer::from_config(&config);
        let err = s.synthesize("hola", "es").await.unwrap_err();
        assert!(matches!(err, TtsError::Request(_) | TtsError::Timeout), "{err}");
    }
}
