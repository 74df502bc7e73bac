use serde::Serialize;

/// One phonetic symbol of either stream.
pub type PhonemeUnit = char;

#[derive(Debug, Clone)]
pub struct RecordingInput {
    pub sample_rate_hz: u32,
    pub samples: Vec<f32>,
    pub expected_text: String,
}

/// An expected word with its phonemes and their offsets in the concatenated expected stream.
#[derive(Debug, Clone, PartialEq)]
pub struct WordPhonemeSpan {
    pub word: String,
    pub phonemes: Vec<PhonemeUnit>,
    /// Offset interval is [start, end), i.e. start inclusive/end exclusive.
    pub start: usize,
    /// Offset interval is [start, end), i.e. start inclusive/end exclusive.
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordScore {
    pub word: String,
    /// Pronunciation similarity in [0, 1].
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScoringOutput {
    pub words: Vec<WordScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordVerdict {
    Correct,
    Mispronounced,
    NotDetected,
}

impl WordVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Mispronounced => "mispronounced",
            Self::NotDetected => "not_detected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordAssessment {
    pub index: usize,
    pub word: String,
    pub score: f32,
    pub verdict: WordVerdict,
}

/// A word the learner should practise, with how it is expected to sound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    pub index: usize,
    pub word: String,
    pub expected_phonemes: String,
}

/// Everything derived from one scored sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResult {
    pub output: ScoringOutput,
    pub assessments: Vec<WordAssessment>,
    pub feedback: String,
    pub markup: String,
}
