//! Builds the provider set selected by configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::info;

use textgrab_config::TextGrabConfig;
use textgrab_core::{OcrProvider, SummaryOptions, Summarizer, Translator};
use textgrab_understanding::mock::{EchoTranslator, FixedSummarizer, StaticOcrProvider};
use textgrab_understanding::{
    ExtractiveSummarizer, GoogleAuth, GoogleTranslator, GoogleVisionProvider, LlmSummarizer,
};

pub struct Providers {
    pub ocr: Arc<dyn OcrProvider>,
    pub summarizer: Option<Arc<dyn Summarizer>>,
    pub translator: Option<Arc<dyn Translator>>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Access token (with project) wins over API key.
fn google_auth(config: &TextGrabConfig) -> Result<GoogleAuth> {
    let google = config.google.as_ref();
    let token = non_empty(google.and_then(|g| g.access_token.as_ref()));
    if let (Some(token), Some(project_id)) = (token, config.project_id()) {
        return Ok(GoogleAuth::AccessToken {
            token: token.to_string(),
            project_id: project_id.to_string(),
        });
    }
    if let Some(key) = non_empty(google.and_then(|g| g.api_key.as_ref())) {
        return Ok(GoogleAuth::ApiKey(key.to_string()));
    }
    bail!("Google providers need GOOGLE_API_KEY or GOOGLE_ACCESS_TOKEN")
}

fn timeout(config: &TextGrabConfig) -> Duration {
    Duration::from_secs(config.provider_timeout_secs())
}

fn vision_provider(config: &TextGrabConfig) -> Result<GoogleVisionProvider> {
    let google = config.google.as_ref();
    let hints = google.map(|g| g.language_hints.clone()).unwrap_or_default();
    let mut vision = GoogleVisionProvider::new(google_auth(config)?)
        .with_timeout(timeout(config))?
        .with_language_hints(hints);
    if let Some(endpoint) = non_empty(google.and_then(|g| g.vision_endpoint.as_ref())) {
        vision = vision.with_endpoint(endpoint);
    }
    Ok(vision)
}

fn google_translator(config: &TextGrabConfig) -> Result<GoogleTranslator> {
    let google = config.google.as_ref();
    let project_id = config
        .project_id()
        .context("google translator needs PROJECT_ID")?;
    let mut translator =
        GoogleTranslator::new(google_auth(config)?, project_id).with_timeout(timeout(config))?;
    if let Some(location) = non_empty(google.and_then(|g| g.location.as_ref())) {
        translator = translator.with_location(location);
    }
    if let Some(url) = non_empty(google.and_then(|g| g.translate_endpoint.as_ref())) {
        translator = translator.with_base_url(url);
    }
    Ok(translator)
}

pub fn build_ocr(config: &TextGrabConfig) -> Result<Arc<dyn OcrProvider>> {
    let provider: Arc<dyn OcrProvider> = match config.ocr_provider() {
        "google" => Arc::new(vision_provider(config)?),
        "mock" => Arc::new(StaticOcrProvider::sample()),
        other => bail!("Unknown OCR provider: {other}"),
    };
    Ok(provider)
}

pub fn build_summarizer(config: &TextGrabConfig) -> Result<Option<Arc<dyn Summarizer>>> {
    let settings = config.summarizer.clone().unwrap_or_default();
    let provider: Arc<dyn Summarizer> = match config.summarizer_provider() {
        "none" => return Ok(None),
        "extractive" => Arc::new(ExtractiveSummarizer::new(summary_options(config).ratio)),
        "llm" => {
            let api_key = non_empty(settings.api_key.as_ref()).context("llm summarizer needs LLM_API_KEY")?;
            let mut llm = LlmSummarizer::new(api_key, settings.model.unwrap_or_default())
                .with_timeout(timeout(config))?;
            if let Some(url) = non_empty(settings.base_url.as_ref()) {
                llm = llm.with_base_url(url);
            }
            if let Some(min_words) = settings.min_words {
                llm = llm.with_min_words(min_words);
            }
            Arc::new(llm)
        }
        "mock" => Arc::new(FixedSummarizer::default()),
        other => bail!("Unknown summarizer provider: {other}"),
    };
    Ok(Some(provider))
}

pub fn build_translator(config: &TextGrabConfig) -> Result<Option<Arc<dyn Translator>>> {
    let provider: Arc<dyn Translator> = match config.translator_provider() {
        "none" => return Ok(None),
        "google" => Arc::new(google_translator(config)?),
        "mock" => Arc::new(EchoTranslator),
        other => bail!("Unknown translation provider: {other}"),
    };
    Ok(Some(provider))
}

pub fn summary_options(config: &TextGrabConfig) -> SummaryOptions {
    let defaults = SummaryOptions::default();
    let settings = config.summarizer.as_ref();
    SummaryOptions {
        ratio: settings.and_then(|s| s.ratio).unwrap_or(defaults.ratio),
        max_tokens: settings.and_then(|s| s.max_tokens).unwrap_or(defaults.max_tokens),
    }
}

/// Instantiate every configured provider. Fails on the first one that
/// cannot be built.
pub fn build_providers(config: &TextGrabConfig) -> Result<Providers> {
    let providers = Providers {
        ocr: build_ocr(config)?,
        summarizer: build_summarizer(config)?,
        translator: build_translator(config)?,
    };
    info!(
        ocr = providers.ocr.name(),
        summarizer = providers.summarizer.as_ref().map(|s| s.name()).unwrap_or("none"),
        translator = providers.translator.as_ref().map(|t| t.name()).unwrap_or("none"),
        "Registered providers"
    );
    Ok(providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use textgrab_config::schema::{GoogleConfig, ProvidersConfig, SummarizerConfig};
    use textgrab_config::apply_all_defaults;

    fn config(ocr: &str, summarizer: &str, translator: &str) -> TextGrabConfig {
        apply_all_defaults(TextGrabConfig {
            providers: Some(ProvidersConfig {
                ocr: Some(ocr.into()),
                summarizer: Some(summarizer.into()),
                translator: Some(translator.into()),
            }),
            google: Some(GoogleConfig {
                project_id: Some("demo".into()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[test]
    fn mock_and_none_need_no_credentials() {
        let providers = build_providers(&config("mock", "none", "mock")).unwrap();
        assert_eq!(providers.ocr.name(), "mock");
        assert!(providers.summarizer.is_none());
        assert_eq!(providers.translator.unwrap().name(), "mock");
    }

    #[test]
    fn google_without_credentials_fails() {
        let err = build_providers(&config("google", "extractive", "none"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn google_with_api_key_builds_both_providers() {
        let mut cfg = config("google", "extractive", "google");
        cfg.google.as_mut().unwrap().api_key = Some("key".into());
        let providers = build_providers(&cfg).unwrap();
        assert_eq!(providers.ocr.name(), "google-vision");
        assert_eq!(providers.summarizer.unwrap().name(), "extractive");
        assert_eq!(providers.translator.unwrap().name(), "google-translate");
    }

    #[test]
    fn access_token_is_preferred() {
        let mut cfg = config("google", "none", "none");
        let google = cfg.google.as_mut().unwrap();
        google.api_key = Some("key".into());
        google.access_token = Some("ya29.token".into());
        assert!(matches!(google_auth(&cfg).unwrap(), GoogleAuth::AccessToken { .. }));
    }

    #[test]
    fn llm_summarizer_uses_configured_ratio_and_key() {
        let mut cfg = config("mock", "llm", "none");
        assert!(build_summarizer(&cfg).is_err());
        cfg.summarizer = Some(SummarizerConfig {
            api_key: Some("sk-test".into()),
            ratio: Some(0.5),
            ..cfg.summarizer.clone().unwrap_or_default()
        });
        assert_eq!(build_summarizer(&cfg).unwrap().unwrap().name(), "llm");
        assert_eq!(summary_options(&cfg).ratio, 0.5);
    }

    #[test]
    fn regional_endpoints_are_applied() {
        let mut cfg = config("google", "none", "google");
        let google = cfg.google.as_mut().unwrap();
        google.api_key = Some("key".into());
        assert_eq!(
            vision_provider(&cfg).unwrap().endpoint(),
            "https://vision.googleapis.com/v1/images:annotate"
        );

        let google = cfg.google.as_mut().unwrap();
        google.vision_endpoint = Some("https://eu-vision.googleapis.com/v1/images:annotate".into());
        google.translate_endpoint = Some("https://translation.example.test".into());
        assert_eq!(
            vision_provider(&cfg).unwrap().endpoint(),
            "https://eu-vision.googleapis.com/v1/images:annotate"
        );
        assert_eq!(
            google_translator(&cfg).unwrap().base_url(),
            "https://translation.example.test"
        );
    }

    #[tokio::test]
    async fn llm_min_words_comes_from_config() {
        let mut cfg = config("mock", "llm", "none");
        cfg.summarizer = Some(SummarizerConfig {
            api_key: Some("sk-test".into()),
            base_url: Some("http://127.0.0.1:9".into()),
            min_words: Some(50),
            ..cfg.summarizer.clone().unwrap_or_default()
        });
        let summarizer = build_summarizer(&cfg).unwrap().unwrap();
        let text = "word ".repeat(30);
        // below the threshold, so no request is made
        let out = summarizer
            .summarize(&text, &summary_options(&cfg))
            .await
            .unwrap();
        assert_eq!(out, text);
    }
}
