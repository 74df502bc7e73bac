pub mod matching;
pub mod segments;

pub use matching::{BlockMatcher, MatchingBlock};
pub use segments::{aligned_segment, build_word_spans, phoneme_units};
