use async_trait::async_trait;

use crate::error::Result;
use crate::types::RecognizedBlock;

/// A cloud or local OCR engine producing a word/symbol recognition stream.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Provider name (e.g., "google-vision", "mock").
    fn name(&self) -> &str;

    /// Recognize the text in an encoded image (PNG, JPEG, ...).
    async fn recognize(&self, image: &[u8]) -> Result<Vec<RecognizedBlock>>;
}

/// Tuning knobs passed to a summarizer on each call.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    /// Fraction of the input to keep, for ratio-based summarizers.
    pub ratio: f32,
    /// Upper bound on generated tokens, for generative summarizers.
    pub max_tokens: u32,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            ratio: 0.3,
            max_tokens: 256,
        }
    }
}

/// Produces a shorter natural-language version of a text.
///
/// Input too short to summarize may be returned unchanged.
#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String>;
}

/// Translates text between two language codes (BCP-47, e.g. "en", "zh-CN").
#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct UpperTranslator;

    #[async_trait]
    impl Translator for UpperTranslator {
        fn name(&self) -> &str {
            "upper"
        }

        async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn translators_are_object_safe() {
        let translator: Arc<dyn Translator> = Arc::new(UpperTranslator);
        let out = translator.translate("hola", "es", "en").await.unwrap();
        assert_eq!(out, "HOLA");
        assert_eq!(translator.name(), "upper");
    }

    #[test]
    fn summary_defaults_keep_thirty_percent() {
        let opts = SummaryOptions::default();
        assert!((opts.ratio - 0.3).abs() < f32::EPSILON);
    }
}
