pub mod error;
pub mod geometry;
pub mod traits;
pub mod types;

pub use error::{Result, TextGrabError};
pub use geometry::{BoundingBox, Vertex};
pub use traits::{OcrProvider, SummaryOptions, Summarizer, Translator};
pub use types::{
    Block, BreakType, Line, Paragraph, RecognizedBlock, Symbol, TextDocument, Word,
};
