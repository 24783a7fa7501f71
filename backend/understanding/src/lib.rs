pub mod annotate;
pub mod google;
mod http;
pub mod layout;
pub mod mock;
pub mod overlay;
pub mod summarize;
pub mod translate;
pub mod vision;

pub use annotate::{Annotator, decode_image};
pub use google::GoogleAuth;
pub use layout::{
    LineBuilder, MalformedWord, PageLayout, ParagraphLayout, layout_paragraph, reconstruct,
};
pub use summarize::{ExtractiveSummarizer, LlmSummarizer};
pub use translate::GoogleTranslator;
pub use vision::GoogleVisionProvider;
