//! Image annotation pipeline: decode, recognize, reconstruct.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::info;

use textgrab_core::{OcrProvider, Result, TextGrabError};

use crate::layout::{PageLayout, reconstruct};

/// Runs an OCR provider over an image and rebuilds its text layout.
#[derive(Clone)]
pub struct Annotator {
    ocr: Arc<dyn OcrProvider>,
}

impl Annotator {
    pub fn new(ocr: Arc<dyn OcrProvider>) -> Self {
        Self { ocr }
    }

    pub fn provider_name(&self) -> &str {
        self.ocr.name()
    }

    /// Annotate a base64 image, with or without a `data:` URL prefix.
    pub async fn annotate_base64(&self, encoded: &str) -> Result<PageLayout> {
        let image = decode_image(encoded)?;
        self.annotate_bytes(&image).await
    }

    pub async fn annotate_bytes(&self, image: &[u8]) -> Result<PageLayout> {
        if image.is_empty() {
            return Err(TextGrabError::InvalidImage("image data is empty".into()));
        }
        let recognized = self.ocr.recognize(image).await?;
        let page = reconstruct(&recognized);
        info!(
            provider = self.ocr.name(),
            blocks = page.blocks.len(),
            lines = page.line_count(),
            "Processed image"
        );
        Ok(page)
    }
}

/// Decode a base64 payload, stripping a `data:<mime>;base64,` prefix if present.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if payload.is_empty() {
        return Err(TextGrabError::InvalidImage("image data is empty".into()));
    }
    STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| TextGrabError::InvalidImage(format!("not valid base64: {e}")))
}
