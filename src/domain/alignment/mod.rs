// Nothing here returns an error. Malformed input degrades to empty or
// zero-length spans.

pub mod segmenter;
pub mod timeline;
pub mod weighter;

pub use segmenter::{segment, segment_by_punctuation, RawSentence};
pub use timeline::{SentenceSpan, Timeline};
pub use weighter::weight;
