//! Debug overlay: draws reconstructed blocks and lines onto the source image.

use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use textgrab_core::{BoundingBox, TextDocument};

const BLOCK_COLOR: Rgba<u8> = Rgba([0, 200, 0, 255]);
const LINE_COLOR: Rgba<u8> = Rgba([220, 0, 0, 255]);

fn to_rect(bbox: &BoundingBox) -> Option<Rect> {
    // imageproc rejects empty rectangles
    (bbox.width > 0 && bbox.height > 0)
        .then(|| Rect::at(bbox.x, bbox.y).of_size(bbox.width as u32, bbox.height as u32))
}

/// Draw block outlines in green and line outlines in red.
pub fn draw_layout(image: &DynamicImage, document: &TextDocument) -> RgbaImage {
    let mut canvas = image.to_rgba8();
    for block in &document.blocks {
        if let Some(rect) = to_rect(&block.bounding_box) {
            draw_hollow_rect_mut(&mut canvas, rect, BLOCK_COLOR);
        }
        for line in &block.lines {
            if let Some(rect) = to_rect(&line.bounding_box) {
                draw_hollow_rect_mut(&mut canvas, rect, LINE_COLOR);
            }
        }
    }
    canvas
}

/// Render the overlay for `image_path` and write it to `out_path`.
pub fn save_overlay(image_path: &Path, document: &TextDocument, out_path: &Path) -> Result<()> {
    let image = image::open(image_path)
        .with_context(|| format!("failed to open image at {}", image_path.display()))?;
    draw_layout(&image, document)
        .save(out_path)
        .with_context(|| format!("failed to write overlay to {}", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use textgrab_core::{Block, Line};

    #[test]
    fn draws_block_and_line_edges() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255])));
        let doc = TextDocument {
            blocks: vec![Block {
                bounding_box: BoundingBox::new(2, 2, 30, 30),
                lines: vec![Line {
                    bounding_box: BoundingBox::new(5, 5, 10, 5),
                    text: "hi".into(),
                }],
            }],
            ..Default::default()
        };
        let out = draw_layout(&image, &doc);
        assert_eq!(*out.get_pixel(2, 2), BLOCK_COLOR);
        assert_eq!(*out.get_pixel(5, 5), LINE_COLOR);
        assert_eq!(*out.get_pixel(20, 20), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn empty_boxes_are_skipped() {
        assert!(to_rect(&BoundingBox::new(1, 1, 0, 5)).is_none());
        assert!(to_rect(&BoundingBox::new(1, 1, 3, 5)).is_some());
    }
}
