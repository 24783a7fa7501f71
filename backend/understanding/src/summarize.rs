//! Text summarization.
//!
//! Two interchangeable strategies behind [`Summarizer`]:
//! - [`ExtractiveSummarizer`]: TextRank over sentences, keeps a ratio of them.
//! - [`LlmSummarizer`]: asks an OpenAI-compatible chat endpoint for a summary.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use textgrab_core::{Result, Summarizer, SummaryOptions, TextGrabError};

use crate::http::client_with_timeout;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+[\s]+").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

const DAMPING: f64 = 0.85;
const MAX_ITERATIONS: usize = 100;
const CONVERGENCE: f64 = 1e-6;

/// Split text into trimmed, non-empty sentences, keeping their punctuation.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        let sentence = text[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn word_set(sentence: &str) -> HashSet<String> {
    WORD.find_iter(sentence)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// TextRank similarity: shared words normalized by log sentence lengths.
fn similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let shared = a.intersection(b).count();
    if shared == 0 || a.len() < 2 || b.len() < 2 {
        return 0.0;
    }
    shared as f64 / ((a.len() as f64).ln() + (b.len() as f64).ln())
}

/// PageRank scores for each sentence over the similarity graph.
fn rank(sentences: &[&str]) -> Vec<f64> {
    let n = sentences.len();
    let words: Vec<_> = sentences.iter().map(|s| word_set(s)).collect();

    let mut weights = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let w = similarity(&words[i], &words[j]);
            weights[i][j] = w;
            weights[j][i] = w;
        }
    }
    let out_sums: Vec<f64> = weights.iter().map(|row| row.iter().sum()).collect();

    let mut scores = vec![1.0 / n as f64; n];
    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![(1.0 - DAMPING) / n as f64; n];
        for (i, slot) in next.iter_mut().enumerate() {
            for j in 0..n {
                if out_sums[j] > 0.0 {
                    *slot += DAMPING * weights[j][i] / out_sums[j] * scores[j];
                }
            }
        }
        let delta: f64 = next.iter().zip(&scores).map(|(a, b)| (a - b).abs()).sum();
        scores = next;
        if delta < CONVERGENCE {
            break;
        }
    }
    scores
}

/// Ratio-based extractive summarizer.
pub struct ExtractiveSummarizer {
    default_ratio: f32,
}

impl ExtractiveSummarizer {
    pub fn new(default_ratio: f32) -> Self {
        Self { default_ratio }
    }

    /// Pick the highest-ranked sentences, returned in their original order.
    ///
    /// Returns `None` when the text has fewer than two sentences.
    pub fn extract(&self, text: &str, ratio: f32) -> Option<String> {
        let sentences = split_sentences(text);
        let n = sentences.len();
        if n < 2 {
            return None;
        }

        let ratio = if ratio > 0.0 && ratio < 1.0 { ratio } else { self.default_ratio };
        let keep = ((n as f32 * ratio).round() as usize).clamp(1, n - 1);

        let scores = rank(&sentences);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
        let mut chosen: Vec<usize> = order.into_iter().take(keep).collect();
        chosen.sort_unstable();

        Some(
            chosen
                .into_iter()
                .map(|i| sentences[i])
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(SummaryOptions::default().ratio)
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String> {
        match self.extract(text, options.ratio) {
            Some(summary) => Ok(summary),
            None => {
                debug!("Input too short to summarize; returning it unchanged");
                Ok(text.to_string())
            }
        }
    }
}

/// Generative summarizer backed by an OpenAI-compatible chat completions API.
pub struct LlmSummarizer {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    min_words: usize,
}

impl LlmSummarizer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: model.into(),
            min_words: 20,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = client_with_timeout(timeout)?;
        Ok(self)
    }

    /// Inputs with fewer words than this are returned unchanged.
    pub fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    fn is_too_short(&self, text: &str) -> bool {
        text.split_whitespace().count() < self.min_words
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

const SYSTEM_PROMPT: &str = "Summarize the user's text in a few sentences. \
Reply with the summary only, in the language of the text.";

#[async_trait]
impl Summarizer for LlmSummarizer {
    fn name(&self) -> &str {
        "llm"
    }

    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String> {
        if self.is_too_short(text) {
            return Ok(text.to_string());
        }
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            max_tokens: options.max_tokens,
            temperature: 0.2,
        };

        debug!(model = %self.model, "Sending summary request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TextGrabError::provider("llm", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(TextGrabError::provider(
                "llm",
                format!("{status}: {error_body}"),
            ));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| TextGrabError::provider("llm", e))?;
        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            "Summary received"
        );
        summary_from_response(text, chat)
    }
}

/// Take the first choice as the summary.
///
/// A reply that is not shorter than the input is replaced by the input
/// itself, the same result as for input too short to summarize.
fn summary_from_response(text: &str, chat: ChatResponse) -> Result<String> {
    let summary = chat
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.trim().to_string())
        .unwrap_or_default();
    if summary.is_empty() {
        return Err(TextGrabError::provider("llm", "empty summary"));
    }
    if summary.chars().count() >= text.chars().count() {
        debug!(
            input_chars = text.chars().count(),
            summary_chars = summary.chars().count(),
            "Model reply is not shorter than its input; keeping the input"
        );
        return Ok(text.to_string());
    }
    Ok(summary)
}
