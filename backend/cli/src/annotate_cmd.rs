//! CLI Annotate Command
//!
//! Runs the OCR provider and layout reconstruction on a local image, prints
//! the resulting document as JSON and optionally writes a box overlay.

use std::path::Path;

use anyhow::{Context, Result};
use textgrab_config::TextGrabConfig;
use textgrab_understanding::Annotator;
use textgrab_understanding::overlay::save_overlay;
use tracing::info;

use crate::providers::build_ocr;

pub async fn run(config: &TextGrabConfig, image: &Path, overlay: Option<&Path>) -> Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let annotator = Annotator::new(build_ocr(config)?);
    let page = annotator.annotate_bytes(&bytes).await?;
    if page.skipped_words > 0 {
        info!(skipped = page.skipped_words, "Some words had malformed geometry");
    }
    let document = page.into_document();

    if let Some(out) = overlay {
        save_overlay(image, &document, out)?;
        info!(path = %out.display(), "Wrote layout overlay");
    }

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
