use std::time::Duration;

use crate::alignment::segments::{build_word_spans, phoneme_units};
use crate::error::ScoringError;
use crate::pipeline::traits::{PhonemeRecognizer, PhonemeScorer, Phonemizer, SegmentAligner};
use crate::scoring::verdict::{assess_words, feedback, highlight_markup};
use crate::session::ReadingSession;
use crate::types::{
    PhonemeUnit, RecordingInput, ReviewItem, ScoringOutput, TurnResult, WordAssessment,
    WordScore, WordVerdict,
};

pub struct ReadingScorer {
    phonemizer: Box<dyn Phonemizer>,
    segment_aligner: Box<dyn SegmentAligner>,
    phoneme_scorer: Box<dyn PhonemeScorer>,
    recognizer: Option<Box<dyn PhonemeRecognizer>>,
    correct_threshold: f32,
    flag_final_word: bool,
}

pub(crate) struct ReadingScorerParts {
    pub phonemizer: Box<dyn Phonemizer>,
    pub segment_aligner: Box<dyn SegmentAligner>,
    pub phoneme_scorer: Box<dyn PhonemeScorer>,
    pub recognizer: Option<Box<dyn PhonemeRecognizer>>,
    pub correct_threshold: f32,
    pub flag_final_word: bool,
}

impl ReadingScorer {
    pub(crate) fn from_parts(parts: ReadingScorerParts) -> Self {
        Self {
            phonemizer: parts.phonemizer,
            segment_aligner: parts.segment_aligner,
            phoneme_scorer: parts.phoneme_scorer,
            recognizer: parts.recognizer,
            correct_threshold: parts.correct_threshold,
            flag_final_word: parts.flag_final_word,
        }
    }

    pub fn correct_threshold(&self) -> f32 {
        self.correct_threshold
    }

    pub fn flag_final_word(&self) -> bool {
        self.flag_final_word
    }

    pub fn phonemizer_name(&self) -> &'static str {
        self.phonemizer.name()
    }

    /// Phoneme transcription of `text`, one group per word.
    pub fn expected_phonemes(&self, text: &str) -> Result<String, ScoringError> {
        self.phonemizer.phonemize(text)
    }

    /// Scores every whitespace-separated word of `expected_text` against the
    /// recognized phoneme string. The output has exactly one entry per word;
    /// words the recording never reached score 0.0.
    pub fn compare(
        &self,
        expected_text: &str,
        recognized_phonemes: &str,
    ) -> Result<ScoringOutput, ScoringError> {
        let expected_words: Vec<&str> = expected_text.split_whitespace().collect();
        if expected_words.is_empty() {
            return Ok(ScoringOutput::default());
        }

        let expected_phonemes = self.phonemizer.phonemize(expected_text)?;
        let groups: Vec<&str> = expected_phonemes.split_whitespace().collect();
        if groups.is_empty() {
            return Err(ScoringError::phonemizer(
                self.phonemizer.name(),
                format!("no phonemes produced for {} word(s)", expected_words.len()),
            ));
        }
        if groups.len() != expected_words.len() {
            tracing::warn!(
                word_count = expected_words.len(),
                group_count = groups.len(),
                phonemizer = self.phonemizer.name(),
                "phoneme group count differs from word count; uncovered words score 0"
            );
        }

        let spans = build_word_spans(&expected_words, &groups);
        let expected_stream: Vec<PhonemeUnit> = groups.iter().flat_map(|g| g.chars()).collect();
        let recognized_stream = phoneme_units(recognized_phonemes);

        let mut words: Vec<WordScore> = Vec::with_capacity(expected_words.len());
        if recognized_stream.is_empty() {
            tracing::debug!(
                word_count = expected_words.len(),
                "compare: empty recognized stream, every word scores 0"
            );
        } else {
            let segments =
                self.segment_aligner
                    .align_segments(&expected_stream, &recognized_stream, &spans);
            debug_assert_eq!(segments.len(), spans.len(), "one segment per span");

            for (span, segment) in spans.iter().zip(segments.iter()) {
                let score = self.phoneme_scorer.score(&span.phonemes, segment);
                tracing::debug!(
                    word = span.word.as_str(),
                    start = span.start,
                    end = span.end,
                    expected = span.phonemes.iter().collect::<String>(),
                    aligned = segment.iter().collect::<String>(),
                    score = format!("{score:.3}"),
                    "compare: scored word"
                );
                words.push(WordScore {
                    word: span.word.clone(),
                    score,
                });
            }

            let covered_end = spans.last().map_or(0, |span| span.end);
            if words.len() < expected_words.len() && covered_end < recognized_stream.len() {
                let leftover = &recognized_stream[covered_end..];
                let last_group = phoneme_units(groups[groups.len() - 1]);
                let score = self.phoneme_scorer.score(&last_group, leftover);
                let final_index = expected_words.len() - 1;
                tracing::debug!(
                    word = expected_words[final_index],
                    leftover = leftover.iter().collect::<String>(),
                    score = format!("{score:.3}"),
                    "compare: scored final word from leftover recognized phonemes"
                );
                pad_with_zero(&mut words, &expected_words[..final_index]);
                words.push(WordScore {
                    word: expected_words[final_index].to_string(),
                    score,
                });
            }
        }
        pad_with_zero(&mut words, &expected_words);

        debug_assert_eq!(words.len(), expected_words.len());
        Ok(ScoringOutput { words })
    }

    /// Runs the configured recognizer on a recording, then [`compare`](Self::compare).
    pub fn score_recording(&self, input: &RecordingInput) -> Result<ScoringOutput, ScoringError> {
        if input.samples.is_empty() || input.expected_text.trim().is_empty() {
            return Ok(ScoringOutput::default());
        }
        let recognizer = self.recognizer.as_ref().ok_or_else(|| {
            ScoringError::invalid_input("no phoneme recognizer configured for recordings")
        })?;
        let recognized = recognizer.recognize(&input.samples, input.sample_rate_hz)?;
        tracing::debug!(
            recognizer = recognizer.label(),
            recognized = recognized.as_str(),
            "recognizer: decoded recording"
        );
        self.compare(&input.expected_text, &recognized)
    }

    /// Verdicts for a scored sentence, with the final-word policy applied.
    pub fn assess(&self, output: &ScoringOutput) -> Vec<WordAssessment> {
        let words: Vec<&str> = output.words.iter().map(|w| w.word.as_str()).collect();
        assess_words(
            &output.words,
            &words,
            self.correct_threshold,
            self.flag_final_word,
        )
    }

    pub fn feedback(&self, output: &ScoringOutput, expected_text: &str) -> String {
        let words: Vec<&str> = expected_text.split_whitespace().collect();
        feedback(&output.words, &words, self.correct_threshold)
    }

    /// Words that were not read correctly, with the phonemes the learner should aim for.
    pub fn review_queue(
        &self,
        assessments: &[WordAssessment],
    ) -> Result<Vec<ReviewItem>, ScoringError> {
        assessments
            .iter()
            .filter(|a| a.verdict != WordVerdict::Correct)
            .map(|a| {
                Ok(ReviewItem {
                    index: a.index,
                    word: a.word.clone(),
                    expected_phonemes: self.phonemizer.phonemize(&a.word)?,
                })
            })
            .collect()
    }

    /// Scores one sentence and records it into `session`.
    pub fn score_turn(
        &self,
        session: &mut ReadingSession,
        expected_text: &str,
        recognized_phonemes: &str,
        elapsed: Duration,
    ) -> Result<TurnResult, ScoringError> {
        let output = self.compare(expected_text, recognized_phonemes)?;
        session.record_turn(&output, elapsed);
        let assessments = self.assess(&output);
        Ok(TurnResult {
            feedback: self.feedback(&output, expected_text),
            markup: highlight_markup(&assessments),
            assessments,
            output,
        })
    }

    pub fn start_session(&self) -> ReadingSession {
        ReadingSession::new(self.correct_threshold)
    }
}

fn pad_with_zero(words: &mut Vec<WordScore>, expected_words: &[&str]) {
    for word in expected_words.iter().skip(words.len()) {
        words.push(WordScore {
            word: (*word).to_string(),
            score: 0.0,
        });
    }
}
