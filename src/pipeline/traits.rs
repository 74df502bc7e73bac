use crate::error::ScoringError;
use crate::types::{PhonemeUnit, WordPhonemeSpan};

/// Grapheme-to-phoneme conversion: one whitespace-delimited group per word,
/// stress and punctuation stripped. Must fail rather than return nothing.
pub trait Phonemizer: Send + Sync {
    fn phonemize(&self, text: &str) -> Result<String, ScoringError>;

    fn name(&self) -> &'static str;
}

/// Maps each expected word span to the recognized units judged to correspond to it.
pub trait SegmentAligner: Send + Sync {
    fn align_segments(
        &self,
        expected: &[PhonemeUnit],
        recognized: &[PhonemeUnit],
        spans: &[WordPhonemeSpan],
    ) -> Vec<Vec<PhonemeUnit>>;
}

/// Similarity in [0, 1] between an expected phoneme slice and what was heard.
pub trait PhonemeScorer: Send + Sync {
    fn score(&self, expected: &[PhonemeUnit], recorded: &[PhonemeUnit]) -> f32;
}

/// Acoustic model boundary: mono samples in, recognized phoneme string out.
pub trait PhonemeRecognizer: Send + Sync {
    fn recognize(&self, samples: &[f32], sample_rate_hz: u32) -> Result<String, ScoringError>;

    fn label(&self) -> String;
}
