//! Config defaults: fills every unset field with its runtime value.

use crate::schema::{
    GoogleConfig, LoggingConfig, ProvidersConfig, RateLimitConfig, ServerConfig,
    SummarizerConfig, TextGrabConfig,
};

pub const DEFAULT_BIND: &str = "0.0.0.0";

/// `/process` admits this many requests per client per window.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 10;

pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Vision rejects JSON requests over 10 MB, and the image travels base64 in both.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_OCR_PROVIDER: &str = "google";
pub const DEFAULT_SUMMARIZER_PROVIDER: &str = "extractive";
pub const DEFAULT_TRANSLATOR_PROVIDER: &str = "google";

pub const DEFAULT_SUMMARY_RATIO: f32 = 0.3;
pub const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 256;
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_LLM_MIN_WORDS: usize = 20;

pub const DEFAULT_TRANSLATE_LOCATION: &str = "global";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: TextGrabConfig) -> TextGrabConfig {
    let config = apply_server_defaults(config);
    let config = apply_provider_defaults(config);
    let config = apply_summarizer_defaults(config);
    let config = apply_google_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: TextGrabConfig) -> TextGrabConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if server.bind.is_none() {
        server.bind = Some(DEFAULT_BIND.to_string());
    }
    if server.provider_timeout_secs.is_none() {
        server.provider_timeout_secs = Some(DEFAULT_PROVIDER_TIMEOUT_SECS);
    }
    if server.max_body_bytes.is_none() {
        server.max_body_bytes = Some(DEFAULT_MAX_BODY_BYTES);
    }
    let limit = server.rate_limit.get_or_insert_with(RateLimitConfig::default);
    if limit.max_requests.is_none() {
        limit.max_requests = Some(DEFAULT_RATE_LIMIT_MAX_REQUESTS);
    }
    if limit.window_secs.is_none() {
        limit.window_secs = Some(DEFAULT_RATE_LIMIT_WINDOW_SECS);
    }
    config
}

fn apply_provider_defaults(mut config: TextGrabConfig) -> TextGrabConfig {
    let providers = config.providers.get_or_insert_with(ProvidersConfig::default);
    if providers.ocr.is_none() {
        providers.ocr = Some(DEFAULT_OCR_PROVIDER.to_string());
    }
    if providers.summarizer.is_none() {
        providers.summarizer = Some(DEFAULT_SUMMARIZER_PROVIDER.to_string());
    }
    if providers.translator.is_none() {
        providers.translator = Some(DEFAULT_TRANSLATOR_PROVIDER.to_string());
    }
    config
}

fn apply_summarizer_defaults(mut config: TextGrabConfig) -> TextGrabConfig {
    let summarizer = config.summarizer.get_or_insert_with(SummarizerConfig::default);
    if summarizer.ratio.is_none() {
        summarizer.ratio = Some(DEFAULT_SUMMARY_RATIO);
    }
    if summarizer.max_tokens.is_none() {
        summarizer.max_tokens = Some(DEFAULT_SUMMARY_MAX_TOKENS);
    }
    if summarizer.model.is_none() {
        summarizer.model = Some(DEFAULT_LLM_MODEL.to_string());
    }
    if summarizer.base_url.is_none() {
        summarizer.base_url = Some(DEFAULT_LLM_BASE_URL.to_string());
    }
    if summarizer.min_words.is_none() {
        summarizer.min_words = Some(DEFAULT_LLM_MIN_WORDS);
    }
    config
}

fn apply_google_defaults(mut config: TextGrabConfig) -> TextGrabConfig {
    let google = config.google.get_or_insert_with(GoogleConfig::default);
    if google.location.is_none() {
        google.location = Some(DEFAULT_TRANSLATE_LOCATION.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: TextGrabConfig) -> TextGrabConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}
