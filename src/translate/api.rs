//! [`HttpTranslator`] — LibreTranslate-compatible REST client.
//!
//! Works with any endpoint that speaks the LibreTranslate `/translate` wire
//! format (self-hosted LibreTranslate, Argos-based mirrors, …).  All
//! connection details come from [`TranslateConfig`]; nothing is hardcoded.

use async_trait::async_trait;

use crate::config::TranslateConfig;

use super::{TranslateError, Translator};

// ---------------------------------------------------------------------------
// HttpTranslator
// ---------------------------------------------------------------------------

/// Calls a LibreTranslate-compatible `/translate` endpoint.
///
/// The `api_key` field is attached **only** when the config carries a
/// non-empty key, so self-hosted instances that require no authentication
/// work out of the box.
pub struct HttpTranslator {
    client: reqwest::Client,
    config: TranslateConfig,
    /// Source language code sent with every request.
    source_lang: String,
}

impl HttpTranslator {
    /// Build an `HttpTranslator` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &TranslateConfig, source_lang: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            source_lang: source_lang.into(),
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        let url = format!("{}/translate", self.config.base_url);

        let mut body = serde_json::json!({
            "q":      text,
            "source": self.source_lang,
            "target": target_lang,
            "format": "text",
        });

        // Attach the API key only when it is a non-empty string.
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            body["api_key"] = serde_json::Value::String(key.to_string());
        }

        log::info!("translating {} chars → {target_lang}", text.len());

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        if !status.is_success() {
            // LibreTranslate reports failures as {"error": "..."}.
            let msg = json["error"]
                .as_str()
                .unwrap_or("unknown service error")
                .to_string();
            return Err(TranslateError::Service(msg));
        }

        let translated = json["translatedText"]
            .as_str()
            .ok_or(TranslateError::EmptyResponse)?
            .trim()
            .to_string();

        if translated.is_empty() {
            return Err(TranslateError::EmptyResponse);
        }

        Ok(translated)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> TranslateConfig {
        TranslateConfig {
            base_url: "http://localhost:5000".into(),
            api_key: api_key.map(|s| s.to_string()),
            timeout_secs: 15,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _t = HttpTranslator::from_config(&make_config(None), "en");
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let _t = HttpTranslator::from_config(&make_config(Some("")), "en");
    }

    #[test]
    fn from_config_accepts_real_api_key() {
        let _t = HttpTranslator::from_config(&make_config(Some("key-1234")), "en");
    }

    /// `HttpTranslator` must be usable as `dyn Translator`.
    #[test]
    fn translator_is_object_safe() {
        let t: Box<dyn Translator> =
            Box::new(HttpTranslator::from_config(&make_config(None), "en"));
        drop(t);
    }

    /// An unreachable endpoint must surface as Request or Timeout, never a
    /// panic.
    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let config = TranslateConfig {
            base_url: "http://127.0.0.1:1".into(), // nothing listens here
            api_key: None,
            timeout_secs: 1,
        };
        let t = HttpTranslator::from_config(&config, "en");
        let err = t.translate("hello", "hi").await.unwrap_err();
        assert!(
            matches!(err, TranslateError::Request(_) | TranslateError::Timeout),
            "{err}"
        );
    }
}
