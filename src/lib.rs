pub mod alignment;
pub mod config;
pub mod error;
pub mod phonemizer;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod session;
pub mod types;

pub use config::ScoringConfig;
pub use error::ScoringError;
pub use phonemizer::{EspeakPhonemizer, LexiconPhonemizer};
pub use pipeline::builder::ReadingScorerBuilder;
pub use pipeline::runtime::ReadingScorer;
pub use pipeline::traits::{PhonemeRecognizer, PhonemeScorer, Phonemizer, SegmentAligner};
pub use report::{
    build_report, compute_turn_report, Meta, Report, SessionReport, TurnReport, TurnSource,
};
pub use scoring::{feedback, SubstitutionTable};
pub use session::{
    split_sentences, AccuracyTier, ReadingSession, SessionStats, SessionSummary,
};
pub use types::{
    PhonemeUnit, RecordingInput, ReviewItem, ScoringOutput, TurnResult, WordAssessment,
    WordPhonemeSpan, WordScore, WordVerdict,
};
