//! TextGrab runtime configuration schema.
//!
//! Every field is optional at parse time; defaults fill the gaps and
//! validation rejects configs that cannot start a server.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGrabConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Google Cloud project and credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<GoogleConfig>,

    /// Which implementation backs each capability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<ProvidersConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summarizer: Option<SummarizerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitConfig>,
    /// Timeout for outbound provider calls, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_timeout_secs: Option<u64>,
    /// Largest accepted request body; base64 images are about 4/3 of the file size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_requests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Translation location, e.g. "global" or "us-central1".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub language_hints: Vec<String>,
    /// Vision `images:annotate` URL, e.g. the `eu-vision.googleapis.com` regional endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_endpoint: Option<String>,
    /// Translation API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_endpoint: Option<String>,
}

/// Provider selection. Names: `google`, `mock`, and for summaries
/// `extractive` or `llm`; `none` disables a capability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summarizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizerConfig {
    /// Fraction of sentences kept by the extractive summarizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// The llm summarizer returns inputs with fewer words unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_words: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling JSON log files; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl TextGrabConfig {
    pub fn bind_address(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_BIND)
    }

    /// The configured port. Validation guarantees it is present before serving.
    pub fn port(&self) -> Option<u16> {
        self.server.as_ref().and_then(|s| s.port)
    }

    pub fn project_id(&self) -> Option<&str> {
        self.google.as_ref().and_then(|g| g.project_id.as_deref())
    }

    pub fn ocr_provider(&self) -> &str {
        self.providers
            .as_ref()
            .and_then(|p| p.ocr.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_OCR_PROVIDER)
    }

    pub fn summarizer_provider(&self) -> &str {
        self.providers
            .as_ref()
            .and_then(|p| p.summarizer.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_SUMMARIZER_PROVIDER)
    }

    pub fn translator_provider(&self) -> &str {
        self.providers
            .as_ref()
            .and_then(|p| p.translator.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_TRANSLATOR_PROVIDER)
    }

    /// `(max_requests, window_secs)` for `/process`.
    pub fn rate_limit(&self) -> (u32, u64) {
        let limit = self.server.as_ref().and_then(|s| s.rate_limit.as_ref());
        (
            limit
                .and_then(|l| l.max_requests)
                .unwrap_or(crate::defaults::DEFAULT_RATE_LIMIT_MAX_REQUESTS),
            limit
                .and_then(|l| l.window_secs)
                .unwrap_or(crate::defaults::DEFAULT_RATE_LIMIT_WINDOW_SECS),
        )
    }

    pub fn provider_timeout_secs(&self) -> u64 {
        self.server
            .as_ref()
            .and_then(|s| s.provider_timeout_secs)
            .unwrap_or(crate::defaults::DEFAULT_PROVIDER_TIMEOUT_SECS)
    }

    pub fn max_body_bytes(&self) -> usize {
        self.server
            .as_ref()
            .and_then(|s| s.max_body_bytes)
            .unwrap_or(crate::defaults::DEFAULT_MAX_BODY_BYTES)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }
}
