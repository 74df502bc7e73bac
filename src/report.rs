use serde::Serialize;

use crate::error::ScoringError;
use crate::session::{SessionStats, SessionSummary};
use crate::types::{ReviewItem, TurnResult, WordAssessment, WordVerdict};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub turns: Vec<TurnReport>,
    pub session: SessionReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub phonemizer: String,
    pub correct_threshold: f32,
    pub flag_final_word: bool,
    pub turn_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub id: String,
    pub expected_text: String,
    pub recognized_phonemes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
    pub word_count: u32,
    pub correct_word_count: u32,
    pub mean_score: f32,
    pub words: Vec<WordAssessment>,
    pub feedback: String,
    pub markup: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub review: Vec<ReviewItem>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub summary: SessionSummary,
    pub encouragement: String,
    pub stats: SessionStats,
}

pub struct TurnSource<'a> {
    pub id: &'a str,
    pub expected_text: &'a str,
    pub recognized_phonemes: &'a str,
    pub elapsed_ms: Option<u64>,
}

pub fn compute_turn_report(
    source: &TurnSource<'_>,
    turn: &TurnResult,
    review: Vec<ReviewItem>,
    correct_threshold: f32,
) -> Result<TurnReport, ScoringError> {
    let expected_count = source.expected_text.split_whitespace().count();
    if turn.output.words.len() != expected_count {
        return Err(ScoringError::invalid_input(format!(
            "{}: {} word score(s) for {} expected word(s)",
            source.id,
            turn.output.words.len(),
            expected_count
        )));
    }

    let mut notes = Vec::new();
    let word_count = turn.output.words.len();
    let correct_word_count = turn
        .output
        .words
        .iter()
        .filter(|w| w.score >= correct_threshold)
        .count();
    let mean_score = if word_count == 0 {
        0.0
    } else {
        turn.output.words.iter().map(|w| w.score).sum::<f32>() / word_count as f32
    };

    if word_count == 0 {
        notes.push("no words to score".to_string());
    }
    if source.recognized_phonemes.trim().is_empty() && word_count > 0 {
        notes.push("empty recognized phoneme string".to_string());
    }
    let trailing_zero = turn
        .output
        .words
        .iter()
        .rev()
        .take_while(|w| w.score == 0.0)
        .count();
    if trailing_zero > 0 && trailing_zero < word_count {
        notes.push(format!(
            "{trailing_zero} trailing word(s) scored 0.0; recording may be cut off"
        ));
    }
    if let Some(last) = turn.assessments.last() {
        if last.verdict == WordVerdict::Mispronounced && last.score >= correct_threshold {
            notes.push(format!(
                "final word '{}' flagged by the sentence-end policy (score {:.2})",
                last.word, last.score
            ));
        }
    }

    Ok(TurnReport {
        id: source.id.to_string(),
        expected_text: source.expected_text.to_string(),
        recognized_phonemes: source.recognized_phonemes.to_string(),
        elapsed_ms: source.elapsed_ms,
        word_count: word_count as u32,
        correct_word_count: correct_word_count as u32,
        mean_score,
        words: turn.assessments.clone(),
        feedback: turn.feedback.clone(),
        markup: turn.markup.clone(),
        review,
        notes,
    })
}

pub fn build_report(meta: Meta, turns: Vec<TurnReport>, session: SessionReport) -> Report {
    Report {
        schema_version: REPORT_SCHEMA_VERSION,
        meta,
        turns,
        session,
    }
}
