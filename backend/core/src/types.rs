use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Vertex};

/// What follows a recognized symbol, as annotated by the OCR provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BreakType {
    /// No break; the next symbol continues the same word.
    #[default]
    Unknown,
    Space,
    SureSpace,
    EolSureSpace,
    LineBreak,
    Hyphen,
}

impl BreakType {
    /// Parse the provider's break label. Unknown labels mean "no break".
    pub fn from_label(label: &str) -> Self {
        match label {
            "SPACE" => Self::Space,
            "SURE_SPACE" => Self::SureSpace,
            "EOL_SURE_SPACE" => Self::EolSureSpace,
            "LINE_BREAK" => Self::LineBreak,
            "HYPHEN" => Self::Hyphen,
            _ => Self::Unknown,
        }
    }

    /// Whitespace appended to the line text after the symbol.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Space | Self::EolSureSpace => " ",
            Self::SureSpace => "  ",
            Self::Hyphen => "-",
            Self::LineBreak | Self::Unknown => "",
        }
    }

    /// Whether the break ends the current line.
    pub fn ends_line(self) -> bool {
        matches!(self, Self::EolSureSpace | Self::LineBreak | Self::Hyphen)
    }
}

/// A single recognized character and the break that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub text: String,
    pub break_type: BreakType,
}

impl Symbol {
    pub fn new(text: impl Into<String>, break_type: BreakType) -> Self {
        Self {
            text: text.into(),
            break_type,
        }
    }
}

/// A recognized word: its polygon and its ordered symbols.
///
/// Only words with exactly four vertices carry usable geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub vertices: Vec<Vertex>,
    pub symbols: Vec<Symbol>,
}

impl Word {
    pub fn new(vertices: Vec<Vertex>, symbols: Vec<Symbol>) -> Self {
        Self { vertices, symbols }
    }

    /// The word's quadrilateral, or `None` for malformed geometry.
    pub fn quad(&self) -> Option<&[Vertex; 4]> {
        <&[Vertex; 4]>::try_from(self.vertices.as_slice()).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub words: Vec<Word>,
}

/// A provider block: its polygon and the paragraphs recognized inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedBlock {
    pub vertices: Vec<Vertex>,
    pub paragraphs: Vec<Paragraph>,
}

/// A reconstructed line of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub bounding_box: BoundingBox,
    pub text: String,
}

/// A reconstructed block. The box is the provider's, not recomputed from lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub bounding_box: BoundingBox,
    pub lines: Vec<Line>,
}

impl Block {
    /// Line texts joined by newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Response payload for a processed image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    pub full_text: String,
    pub lines: Vec<Line>,
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}
