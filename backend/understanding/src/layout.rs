//! Text layout reconstruction.
//!
//! Rebuilds lines and blocks from the provider's flat word/symbol stream,
//! using the break annotation on each symbol to decide where lines end.

use textgrab_core::{
    Block, BoundingBox, Line, Paragraph, RecognizedBlock, Symbol, TextDocument, Word,
};
use thiserror::Error;
use tracing::{debug, warn};

/// A word whose polygon is not a quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("word has {vertex_count} vertices, expected 4")]
pub struct MalformedWord {
    pub vertex_count: usize,
}

/// Accumulates the line currently being read.
#[derive(Debug, Default)]
pub struct LineBuilder {
    text: String,
    bbox: Option<BoundingBox>,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` until a word has been folded into the current line.
    pub fn is_empty(&self) -> bool {
        self.bbox.is_none()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }

    /// Fold a word into the line and return any lines its breaks sealed.
    ///
    /// A malformed word leaves the builder untouched.
    pub fn add_word(&mut self, word: &Word) -> Result<Vec<Line>, MalformedWord> {
        let quad = word.quad().ok_or(MalformedWord {
            vertex_count: word.vertices.len(),
        })?;

        match self.bbox.as_mut() {
            Some(bbox) => bbox.grow_to(quad),
            None => self.bbox = Some(BoundingBox::from_quad(quad)),
        }

        let mut sealed = Vec::new();
        for symbol in &word.symbols {
            // symbols after a mid-word seal belong to a line seeded by this word
            if self.bbox.is_none() {
                self.bbox = Some(BoundingBox::from_quad(quad));
            }
            if let Some(line) = self.push_symbol(symbol) {
                sealed.push(line);
            }
        }
        Ok(sealed)
    }

    /// Append a character, then its break. Returns the line if the break ends it.
    fn push_symbol(&mut self, symbol: &Symbol) -> Option<Line> {
        self.text.push_str(&symbol.text);
        self.text.push_str(symbol.break_type.suffix());
        if symbol.break_type.ends_line() {
            self.seal()
        } else {
            None
        }
    }

    /// Emit the accumulated line and reset. `None` when no text was collected.
    pub fn seal(&mut self) -> Option<Line> {
        let text = std::mem::take(&mut self.text);
        let bbox = self.bbox.take()?;
        if text.is_empty() {
            return None;
        }
        Some(Line {
            bounding_box: bbox,
            text,
        })
    }
}

/// Lines reconstructed from one paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphLayout {
    pub lines: Vec<Line>,
    /// Line texts concatenated; each already ends with its own spacing.
    pub text: String,
    pub skipped_words: usize,
}

/// Reconstruct the lines of a single paragraph.
pub fn layout_paragraph(paragraph: &Paragraph) -> ParagraphLayout {
    let mut builder = LineBuilder::new();
    let mut layout = ParagraphLayout::default();

    for (index, word) in paragraph.words.iter().enumerate() {
        match builder.add_word(word) {
            Ok(sealed) => layout.lines.extend(sealed),
            Err(err) => {
                debug!(word = index, error = %err, "Skipping word with malformed geometry");
                layout.skipped_words += 1;
            }
        }
    }

    // the provider normally ends every paragraph with a line-ending break
    if let Some(line) = builder.seal() {
        layout.lines.push(line);
    }

    layout.text = layout.lines.iter().map(|l| l.text.as_str()).collect();
    layout
}

/// Blocks, paragraph texts, and skip statistics for a whole image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    /// Blocks in provider order.
    pub blocks: Vec<Block>,
    /// Paragraph texts in provider order.
    pub paragraphs: Vec<String>,
    pub skipped_words: usize,
}

/// Reconstruct every block returned by the OCR provider.
pub fn reconstruct(recognized: &[RecognizedBlock]) -> PageLayout {
    let mut page = PageLayout::default();

    for block in recognized {
        let mut lines = Vec::new();
        for paragraph in &block.paragraphs {
            let layout = layout_paragraph(paragraph);
            page.skipped_words += layout.skipped_words;
            page.paragraphs.push(layout.text);
            lines.extend(layout.lines);
        }
        page.blocks.push(Block {
            bounding_box: BoundingBox::from_vertices(&block.vertices),
            lines,
        });
    }

    if page.skipped_words > 0 {
        warn!(
            skipped = page.skipped_words,
            "Dropped words with non-quadrilateral geometry"
        );
    }
    page
}

impl PageLayout {
    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(|b| b.lines.len()).sum()
    }

    /// Build the response document: lines in reading order, blocks sorted by `(top, left)`.
    pub fn into_document(self) -> TextDocument {
        let full_text = self
            .blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n");
        let lines = self
            .blocks
            .iter()
            .flat_map(|b| b.lines.iter().cloned())
            .collect();

        let mut blocks = self.blocks;
        blocks.sort_by_key(|b| (b.bounding_box.top(), b.bounding_box.left()));

        TextDocument {
            full_text,
            lines,
            blocks,
            summary: None,
            translation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textgrab_core::{BreakType, Vertex};

    fn quad(x: i32, y: i32, w: i32, h: i32) -> Vec<Vertex> {
        vec![
            Vertex::new(x, y),
            Vertex::new(x + w, y),
            Vertex::new(x + w, y + h),
            Vertex::new(x, y + h),
        ]
    }

    /// Build a word whose last symbol carries `last_break`.
    fn word(text: &str, (x, y, w, h): (i32, i32, i32, i32), last_break: BreakType) -> Word {
        let chars: Vec<char> = text.chars().collect();
        let symbols = chars
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let brk = if i + 1 == chars.len() { last_break } else { BreakType::Unknown };
                Symbol::new(c.to_string(), brk)
            })
            .collect();
        Word::new(quad(x, y, w, h), symbols)
    }

    fn paragraph(words: Vec<Word>) -> Paragraph {
        Paragraph { words }
    }

    #[test]
    fn two_words_make_one_line() {
        let p = paragraph(vec![
            word("AB", (0, 0, 10, 10), BreakType::Space),
            word("CD", (10, 0, 10, 10), BreakType::LineBreak),
        ]);
        let layout = layout_paragraph(&p);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].text, "AB CD");
        assert_eq!(layout.lines[0].bounding_box, BoundingBox::new(0, 0, 20, 10));
        assert_eq!(layout.text, "AB CD");
    }

    #[test]
    fn unbroken_paragraph_is_flushed_at_the_end() {
        let p = paragraph(vec![
            word("one", (0, 0, 30, 10), BreakType::Space),
            word("two", (35, 0, 30, 10), BreakType::Unknown),
        ]);

        let mut builder = LineBuilder::new();
        for w in &p.words {
            assert!(builder.add_word(w).unwrap().is_empty());
        }
        assert_eq!(builder.text(), "one two");

        let layout = layout_paragraph(&p);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].text, "one two");
        assert_eq!(layout.lines[0].bounding_box, BoundingBox::new(0, 0, 65, 10));
    }

    #[test]
    fn eol_sure_space_seals_with_one_trailing_space() {
        let p = paragraph(vec![
            word("end", (0, 0, 30, 10), BreakType::EolSureSpace),
            word("next", (0, 20, 40, 10), BreakType::LineBreak),
        ]);
        let layout = layout_paragraph(&p);
        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.lines[0].text, "end ");
        assert!(!layout.lines[0].text.ends_with("  "));
        assert_eq!(layout.lines[1].bounding_box, BoundingBox::new(0, 20, 40, 10));
        assert_eq!(layout.text, "end next");
    }

    #[test]
    fn hyphen_seals_and_next_word_starts_fresh_box() {
        let p = paragraph(vec![
            word("recog", (0, 0, 50, 10), BreakType::Hyphen),
            word("nized", (0, 15, 50, 10), BreakType::LineBreak),
        ]);
        let layout = layout_paragraph(&p);
        assert_eq!(layout.lines[0].text, "recog-");
        assert_eq!(layout.lines[0].bounding_box, BoundingBox::new(0, 0, 50, 10));
        assert_eq!(layout.lines[1].bounding_box, BoundingBox::new(0, 15, 50, 10));
    }

    #[test]
    fn sure_space_appends_two_spaces() {
        let p = paragraph(vec![
            word("a", (0, 0, 5, 10), BreakType::SureSpace),
            word("b", (20, 0, 5, 10), BreakType::LineBreak),
        ]);
        assert_eq!(layout_paragraph(&p).lines[0].text, "a  b");
    }

    #[test]
    fn malformed_word_is_skipped() {
        let mut broken = word("XX", (100, 100, 50, 50), BreakType::Space);
        broken.vertices.pop();
        let p = paragraph(vec![
            word("AB", (0, 0, 10, 10), BreakType::Space),
            broken,
            word("CD", (10, 0, 10, 10), BreakType::LineBreak),
        ]);
        let layout = layout_paragraph(&p);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].text, "AB CD");
        assert_eq!(layout.lines[0].bounding_box, BoundingBox::new(0, 0, 20, 10));
        assert_eq!(layout.skipped_words, 1);
    }

    #[test]
    fn malformed_word_leaves_builder_untouched() {
        let mut builder = LineBuilder::new();
        let bad = Word::new(vec![Vertex::default(); 3], vec![Symbol::new("x", BreakType::LineBreak)]);
        let err = builder.add_word(&bad).unwrap_err();
        assert_eq!(err.vertex_count, 3);
        assert!(builder.is_empty());
        assert_eq!(builder.text(), "");
    }

    #[test]
    fn symbolless_word_still_grows_the_box() {
        let p = paragraph(vec![
            word("AB", (0, 0, 10, 10), BreakType::Space),
            Word::new(quad(10, 0, 30, 12), vec![]),
            word("CD", (12, 0, 8, 10), BreakType::LineBreak),
        ]);
        let layout = layout_paragraph(&p);
        assert_eq!(layout.lines[0].text, "AB CD");
        assert_eq!(layout.lines[0].bounding_box, BoundingBox::new(0, 0, 40, 12));
    }

    #[test]
    fn reapplying_a_word_does_not_change_the_box() {
        let w = word("CD", (10, 2, 10, 12), BreakType::Unknown);
        let mut builder = LineBuilder::new();
        builder.add_word(&word("AB", (0, 0, 10, 10), BreakType::Space)).unwrap();
        builder.add_word(&w).unwrap();
        let once = builder.bounding_box();
        builder.add_word(&w).unwrap();
        assert_eq!(builder.bounding_box(), once);
    }

    #[test]
    fn word_inside_the_bound_does_not_shrink_it() {
        let p = paragraph(vec![
            word("wide", (0, 0, 100, 30), BreakType::Space),
            word("in", (10, 5, 10, 10), BreakType::LineBreak),
        ]);
        assert_eq!(
            layout_paragraph(&p).lines[0].bounding_box,
            BoundingBox::new(0, 0, 100, 30)
        );
    }

    #[test]
    fn asymmetric_growth_moves_origin_left() {
        let p = paragraph(vec![
            word("B", (50, 10, 10, 10), BreakType::Space),
            word("A", (20, 5, 10, 10), BreakType::LineBreak),
        ]);
        // extents are measured from the origin before it shifts
        assert_eq!(
            layout_paragraph(&p).lines[0].bounding_box,
            BoundingBox::new(20, 5, 10, 10)
        );
    }

    #[test]
    fn mid_word_break_reseeds_from_same_word() {
        let w = Word::new(
            quad(0, 0, 20, 10),
            vec![
                Symbol::new("a", BreakType::LineBreak),
                Symbol::new("b", BreakType::LineBreak),
            ],
        );
        let layout = layout_paragraph(&paragraph(vec![w]));
        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.lines[1].text, "b");
        assert_eq!(layout.lines[1].bounding_box, BoundingBox::new(0, 0, 20, 10));
    }

    #[test]
    fn empty_paragraph_has_no_lines() {
        let layout = layout_paragraph(&Paragraph::default());
        assert!(layout.lines.is_empty());
        assert_eq!(layout.text, "");
    }

    fn block(vertices: Vec<Vertex>, paragraphs: Vec<Paragraph>) -> RecognizedBlock {
        RecognizedBlock { vertices, paragraphs }
    }

    #[test]
    fn document_sorts_blocks_and_keeps_line_order() {
        let lower = block(
            quad(0, 100, 200, 20),
            vec![paragraph(vec![word("lower", (0, 100, 50, 20), BreakType::LineBreak)])],
        );
        let right = block(
            quad(300, 0, 100, 20),
            vec![paragraph(vec![word("right", (300, 0, 50, 20), BreakType::LineBreak)])],
        );
        let left = block(
            quad(0, 0, 100, 20),
            vec![
                paragraph(vec![word("left", (0, 0, 40, 20), BreakType::EolSureSpace)]),
                paragraph(vec![word("more", (0, 30, 40, 20), BreakType::LineBreak)]),
            ],
        );

        let page = reconstruct(&[lower, right, left]);
        assert_eq!(page.paragraphs, vec!["lower", "right", "left ", "more"]);
        assert_eq!(page.line_count(), 4);

        let doc = page.into_document();
        assert_eq!(doc.full_text, "lower\nright\nleft \nmore");
        let texts: Vec<_> = doc.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["lower", "right", "left ", "more"]);
        let tops: Vec<_> = doc
            .blocks
            .iter()
            .map(|b| (b.bounding_box.top(), b.bounding_box.left()))
            .collect();
        assert_eq!(tops, vec![(0, 0), (0, 300), (100, 0)]);
    }

    #[test]
    fn block_box_comes_from_provider_polygon() {
        let b = block(
            quad(5, 5, 500, 300),
            vec![paragraph(vec![word("tiny", (10, 10, 20, 10), BreakType::LineBreak)])],
        );
        let page = reconstruct(&[b]);
        assert_eq!(page.blocks[0].bounding_box, BoundingBox::new(5, 5, 500, 300));
    }

    #[test]
    fn skipped_words_accumulate_across_blocks() {
        let mut bad = word("x", (0, 0, 5, 5), BreakType::Space);
        bad.vertices.truncate(2);
        let b = block(quad(0, 0, 10, 10), vec![paragraph(vec![bad.clone()]), paragraph(vec![bad])]);
        let page = reconstruct(&[b]);
        assert_eq!(page.skipped_words, 2);
        assert!(page.blocks[0].lines.is_empty());
    }
}
