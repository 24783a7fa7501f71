//! Google Cloud Vision OCR provider.
//!
//! Calls `images:annotate` with `DOCUMENT_TEXT_DETECTION` and converts the
//! `fullTextAnnotation` hierarchy into the recognition stream.

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use textgrab_core::{
    BreakType, OcrProvider, Paragraph, RecognizedBlock, Result, Symbol, TextGrabError, Vertex,
    Word,
};

use crate::google::{GoogleAuth, Status, error_message};
use crate::http::client_with_timeout;

const PROVIDER: &str = "google-vision";
const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

pub struct GoogleVisionProvider {
    client: Client,
    auth: GoogleAuth,
    endpoint: String,
    language_hints: Vec<String>,
}

impl GoogleVisionProvider {
    pub fn new(auth: GoogleAuth) -> Self {
        Self {
            client: Client::new(),
            auth,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language_hints: Vec::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = client_with_timeout(timeout)?;
        Ok(self)
    }

    pub fn with_language_hints(mut self, hints: Vec<String>) -> Self {
        self.language_hints = hints;
        self
    }
}

// --- Request ---

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [ImageRequest<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest<'a> {
    image: ImageContent,
    features: [Feature; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    image_context: Option<ImageContext<'a>>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageContext<'a> {
    language_hints: &'a [String],
}

// --- Response ---

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    full_text_annotation: Option<TextAnnotation>,
    #[serde(default)]
    error: Option<Status>,
}

#[derive(Debug, Default, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Default, Deserialize)]
struct Page {
    #[serde(default)]
    blocks: Vec<ApiBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiBlock {
    #[serde(default)]
    bounding_box: Poly,
    #[serde(default)]
    paragraphs: Vec<ApiParagraph>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiParagraph {
    #[serde(default)]
    words: Vec<ApiWord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiWord {
    #[serde(default)]
    bounding_box: Poly,
    #[serde(default)]
    symbols: Vec<ApiSymbol>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSymbol {
    #[serde(default)]
    text: String,
    #[serde(default)]
    property: Option<SymbolProperty>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolProperty {
    #[serde(default)]
    detected_break: Option<DetectedBreak>,
}

#[derive(Debug, Default, Deserialize)]
struct DetectedBreak {
    #[serde(default, rename = "type")]
    kind: String,
}

#[derive(Debug, Default, Deserialize)]
struct Poly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

impl ApiSymbol {
    fn into_symbol(self) -> Symbol {
        let break_type = self
            .property
            .and_then(|p| p.detected_break)
            .map(|b| BreakType::from_label(&b.kind))
            .unwrap_or_default();
        Symbol::new(self.text, break_type)
    }
}

impl AnnotateResponse {
    /// Flatten the first response's pages into provider blocks.
    pub(crate) fn into_blocks(self) -> Result<Vec<RecognizedBlock>> {
        let Some(response) = self.responses.into_iter().next() else {
            return Ok(Vec::new());
        };
        if let Some(status) = response.error {
            return Err(TextGrabError::provider(PROVIDER, status.message));
        }
        let Some(annotation) = response.full_text_annotation else {
            return Ok(Vec::new());
        };

        let blocks = annotation
            .pages
            .into_iter()
            .flat_map(|page| page.blocks)
            .map(|block| RecognizedBlock {
                vertices: block.bounding_box.vertices,
                paragraphs: block
                    .paragraphs
                    .into_iter()
                    .map(|p| Paragraph {
                        words: p
                            .words
                            .into_iter()
                            .map(|w| {
                                Word::new(
                                    w.bounding_box.vertices,
                                    w.symbols.into_iter().map(ApiSymbol::into_symbol).collect(),
                                )
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Ok(blocks)
    }
}

#[async_trait]
impl OcrProvider for GoogleVisionProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn recognize(&self, image: &[u8]) -> Result<Vec<RecognizedBlock>> {
        info!(bytes = image.len(), "[Vision] Running document text detection");

        let body = AnnotateRequest {
            requests: [ImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: [Feature {
                    kind: "DOCUMENT_TEXT_DETECTION",
                }],
                image_context: (!self.language_hints.is_empty()).then(|| ImageContext {
                    language_hints: &self.language_hints,
                }),
            }],
        };

        let request = self.auth.apply(self.client.post(&self.endpoint)).json(&body);
        let response = request
            .send()
            .await
            .map_err(|e| TextGrabError::provider(PROVIDER, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TextGrabError::provider(PROVIDER, error_message(status, &text)));
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| TextGrabError::provider(PROVIDER, e.without_url()))?;
        let blocks = parsed.into_blocks()?;
        debug!(blocks = blocks.len(), "[Vision] Annotation parsed");
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "responses": [{
        "fullTextAnnotation": {
          "pages": [{
            "blocks": [{
              "boundingBox": {"vertices": [{"x": 10}, {"x": 90}, {"x": 90, "y": 20}, {"x": 10, "y": 20}]},
              "paragraphs": [{
                "words": [
                  {
                    "boundingBox": {"vertices": [{"x": 10}, {"x": 40}, {"x": 40, "y": 20}, {"x": 10, "y": 20}]},
                    "symbols": [
                      {"text": "H"},
                      {"text": "i", "property": {"detectedBreak": {"type": "SPACE"}}}
                    ]
                  },
                  {
                    "boundingBox": {"vertices": [{"x": 50}, {"x": 90}, {"x": 90, "y": 20}]},
                    "symbols": [{"text": "?", "property": {"detectedBreak": {"type": "LINE_BREAK"}}}]
                  }
                ]
              }]
            }]
          }],
          "text": "Hi ?\n"
        }
      }]
    }"#;

    #[test]
    fn parses_full_text_annotation() {
        let parsed: AnnotateResponse = serde_json::from_str(SAMPLE).unwrap();
        let blocks = parsed.into_blocks().unwrap();
        assert_eq!(blocks.len(), 1);

        let words = &blocks[0].paragraphs[0].words;
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].vertices[0], Vertex::new(10, 0));
        assert_eq!(words[0].symbols[0].break_type, BreakType::Unknown);
        assert_eq!(words[0].symbols[1].break_type, BreakType::Space);
        // the provider may hand back degenerate polygons; they are kept as-is here
        assert_eq!(words[1].vertices.len(), 3);
        assert_eq!(words[1].symbols[0].break_type, BreakType::LineBreak);
    }

    #[test]
    fn response_error_becomes_provider_error() {
        let body = r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#;
        let parsed: AnnotateResponse = serde_json::from_str(body).unwrap();
        let err = parsed.into_blocks().unwrap_err();
        assert!(matches!(err, TextGrabError::Provider { .. }));
        assert!(err.to_string().contains("Bad image data."));
    }

    #[test]
    fn image_without_text_yields_no_blocks() {
        let parsed: AnnotateResponse = serde_json::from_str(r#"{"responses": [{}]}"#).unwrap();
        assert!(parsed.into_blocks().unwrap().is_empty());
        let parsed: AnnotateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_blocks().unwrap().is_empty());
    }

    #[test]
    fn request_body_shape() {
        let hints = vec!["en".to_string()];
        let body = AnnotateRequest {
            requests: [ImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(b"png"),
                },
                features: [Feature {
                    kind: "DOCUMENT_TEXT_DETECTION",
                }],
                image_context: Some(ImageContext {
                    language_hints: &hints,
                }),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["requests"][0]["features"][0]["type"], "DOCUMENT_TEXT_DETECTION");
        assert_eq!(json["requests"][0]["image"]["content"], "cG5n");
        assert_eq!(json["requests"][0]["imageContext"]["languageHints"][0], "en");
    }
}
