//! Config validation. Errors stop startup; warnings are only logged.

use crate::schema::TextGrabConfig;
use thiserror::Error;

const OCR_PROVIDERS: &[&str] = &["google", "mock"];
const SUMMARIZER_PROVIDERS: &[&str] = &["extractive", "llm", "mock", "none"];
const TRANSLATOR_PROVIDERS: &[&str] = &["google", "mock", "none"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TextGrabConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_providers(config, &mut report);
    validate_google(config, &mut report);
    validate_summarizer(config, &mut report);
    report
}

fn validate_server(config: &TextGrabConfig, report: &mut ValidationReport) {
    match config.port() {
        None => report.error("server.port", "port is required (set PORT)"),
        Some(0) => report.error("server.port", "port must be > 0"),
        Some(_) => {}
    }
    let Some(server) = &config.server else { return };
    if let Some(limit) = &server.rate_limit {
        if limit.max_requests == Some(0) {
            report.error("server.rateLimit.maxRequests", "maxRequests must be > 0");
        }
        if limit.window_secs == Some(0) {
            report.error("server.rateLimit.windowSecs", "windowSecs must be > 0");
        }
    }
    if server.provider_timeout_secs == Some(0) {
        report.error("server.providerTimeoutSecs", "providerTimeoutSecs must be > 0");
    }
    if server.max_body_bytes == Some(0) {
        report.error("server.maxBodyBytes", "maxBodyBytes must be > 0");
    }
}

fn check_name(report: &mut ValidationReport, path: &str, name: &str, allowed: &[&str]) {
    if !allowed.contains(&name) {
        report.error(
            path,
            format!("unknown provider \"{name}\" (expected one of: {})", allowed.join(", ")),
        );
    }
}

fn validate_providers(config: &TextGrabConfig, report: &mut ValidationReport) {
    check_name(report, "providers.ocr", config.ocr_provider(), OCR_PROVIDERS);
    check_name(
        report,
        "providers.summarizer",
        config.summarizer_provider(),
        SUMMARIZER_PROVIDERS,
    );
    check_name(
        report,
        "providers.translator",
        config.translator_provider(),
        TRANSLATOR_PROVIDERS,
    );
    if config.ocr_provider() == "mock" {
        report.warn("providers.ocr", "mock OCR returns canned text for every image");
    }
}

fn validate_google(config: &TextGrabConfig, report: &mut ValidationReport) {
    match config.project_id() {
        Some(id) if !id.trim().is_empty() => {}
        _ => report.error("google.projectId", "project id is required (set PROJECT_ID)"),
    }

    let uses_google = config.ocr_provider() == "google" || config.translator_provider() == "google";
    if !uses_google {
        return;
    }
    let has_credentials = config
        .google
        .as_ref()
        .map(|g| {
            g.api_key.as_deref().is_some_and(|k| !k.is_empty())
                || g.access_token.as_deref().is_some_and(|t| !t.is_empty())
        })
        .unwrap_or(false);
    if !has_credentials {
        report.error(
            "google",
            "Google providers need credentials (set GOOGLE_API_KEY or GOOGLE_ACCESS_TOKEN)",
        );
    }
}

fn validate_summarizer(config: &TextGrabConfig, report: &mut ValidationReport) {
    let Some(summarizer) = &config.summarizer else { return };
    if let Some(ratio) = summarizer.ratio {
        if !(ratio > 0.0 && ratio < 1.0) {
            report.error("summarizer.ratio", "ratio must be between 0 and 1 (exclusive)");
        }
    }
    if summarizer.max_tokens == Some(0) {
        report.error("summarizer.maxTokens", "maxTokens must be > 0");
    }
    if summarizer.min_words == Some(0) {
        report.error("summarizer.minWords", "minWords must be > 0");
    }
    if config.summarizer_provider() == "llm"
        && summarizer.api_key.as_deref().map_or(true, str::is_empty)
    {
        report.error("summarizer.apiKey", "llm summarizer needs an API key (set LLM_API_KEY)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GoogleConfig, ProvidersConfig, ServerConfig, SummarizerConfig};

    fn valid_config() -> TextGrabConfig {
        TextGrabConfig {
            server: Some(ServerConfig {
                port: Some(8080),
                ..Default::default()
            }),
            google: Some(GoogleConfig {
                project_id: Some("demo".into()),
                api_key: Some("key".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn paths(report: &ValidationReport) -> Vec<&str> {
        report.errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn minimal_google_config_is_valid() {
        assert!(validate(&valid_config()).is_valid());
    }

    #[test]
    fn empty_config_reports_port_project_and_credentials() {
        let report = validate(&TextGrabConfig::default());
        assert_eq!(paths(&report), vec!["server.port", "google.projectId", "google"]);
    }

    #[test]
    fn mock_providers_do_not_need_credentials() {
        let mut cfg = valid_config();
        cfg.google.as_mut().unwrap().api_key = None;
        cfg.providers = Some(ProvidersConfig {
            ocr: Some("mock".into()),
            translator: Some("none".into()),
            ..Default::default()
        });
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut cfg = valid_config();
        cfg.providers = Some(ProvidersConfig {
            summarizer: Some("gpt".into()),
            ..Default::default()
        });
        assert_eq!(paths(&validate(&cfg)), vec!["providers.summarizer"]);
    }

    #[test]
    fn llm_summarizer_needs_key_and_sane_ratio() {
        let mut cfg = valid_config();
        cfg.providers = Some(ProvidersConfig {
            summarizer: Some("llm".into()),
            ..Default::default()
        });
        cfg.summarizer = Some(SummarizerConfig {
            ratio: Some(1.5),
            ..Default::default()
        });
        assert_eq!(paths(&validate(&cfg)), vec!["summarizer.ratio", "summarizer.apiKey"]);
    }

    #[test]
    fn zero_body_limit_and_min_words_are_rejected() {
        let mut cfg = valid_config();
        cfg.server.as_mut().unwrap().max_body_bytes = Some(0);
        cfg.summarizer = Some(SummarizerConfig {
            min_words: Some(0),
            ..Default::default()
        });
        assert_eq!(
            paths(&validate(&cfg)),
            vec!["server.maxBodyBytes", "summarizer.minWords"]
        );
    }
}
