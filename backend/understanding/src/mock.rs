use async_trait::async_trait;

use textgrab_core::{
    BreakType, OcrProvider, Paragraph, RecognizedBlock, Result, Summarizer, SummaryOptions,
    Symbol, Translator, Vertex, Word,
};

fn rect(x: i32, y: i32, w: i32, h: i32) -> Vec<Vertex> {
    vec![
        Vertex::new(x, y),
        Vertex::new(x + w, y),
        Vertex::new(x + w, y + h),
        Vertex::new(x, y + h),
    ]
}

/// A word at `(x, y, w, h)` whose last character carries `last_break`.
pub fn word_at(text: &str, x: i32, y: i32, w: i32, h: i32, last_break: BreakType) -> Word {
    let count = text.chars().count();
    let symbols = text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let brk = if i + 1 == count { last_break } else { BreakType::Unknown };
            Symbol::new(c.to_string(), brk)
        })
        .collect();
    Word::new(rect(x, y, w, h), symbols)
}

/// An OCR provider that returns the same recognition for every image.
pub struct StaticOcrProvider {
    blocks: Vec<RecognizedBlock>,
}

impl StaticOcrProvider {
    pub fn new(blocks: Vec<RecognizedBlock>) -> Self {
        Self { blocks }
    }

    /// One block with two lines: "Hello world" and "again".
    pub fn sample() -> Self {
        Self::new(vec![RecognizedBlock {
            vertices: rect(10, 10, 200, 60),
            paragraphs: vec![Paragraph {
                words: vec![
                    word_at("Hello", 10, 10, 50, 20, BreakType::Space),
                    word_at("world", 70, 10, 50, 20, BreakType::LineBreak),
                    word_at("again", 10, 40, 50, 20, BreakType::LineBreak),
                ],
            }],
        }])
    }
}

#[async_trait]
impl OcrProvider for StaticOcrProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(&self, _image: &[u8]) -> Result<Vec<RecognizedBlock>> {
        Ok(self.blocks.clone())
    }
}

/// A summarizer that returns a canned response, or the first line of the input.
#[derive(Default)]
pub struct FixedSummarizer {
    fixed_response: Option<String>,
}

impl FixedSummarizer {
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            fixed_response: Some(response.into()),
        }
    }
}

#[async_trait]
impl Summarizer for FixedSummarizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn summarize(&self, text: &str, _options: &SummaryOptions) -> Result<String> {
        Ok(self
            .fixed_response
            .clone()
            .unwrap_or_else(|| text.lines().next().unwrap_or_default().to_string()))
    }
}

/// A translator that tags the text with the target language.
pub struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(&self, text: &str, _source_lang: &str, target_lang: &str) -> Result<String> {
        Ok(format!("[{target_lang}] {text}"))
    }
}
