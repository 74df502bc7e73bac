//! Session-level accumulation of reading accuracy and speed.
//!
//! A [`ReadingSession`] is owned by whoever drives the reading flow and is
//! passed by `&mut` into every scored turn, so independent sessions never
//! share counters.

use std::time::Duration;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::scoring::verdict::count_correct;
use crate::types::ScoringOutput;

const EXCELLENT_MESSAGES: [&str; 8] = [
    "Excellent Job!",
    "Well Done!",
    "Outstanding Reading!",
    "Fantastic Effort!",
    "Perfect!",
    "Great Work!",
    "You're a Reading Pro!",
    "Impressive Performance!",
];

const GOOD_MESSAGES: [&str; 8] = [
    "Good Job!",
    "Nice Work!",
    "Keep It Up!",
    "Great Effort!",
    "Almost There!",
    "Solid Reading!",
    "Well Done, Almost Perfect!",
    "Good Reading, Keep Practicing!",
];

const IMPROVING_MESSAGES: [&str; 8] = [
    "You're Getting There!",
    "Keep Trying!",
    "Good Attempt!",
    "Nice Try!",
    "Keep Practicing, You're Improving!",
    "Solid Effort, Keep Working!",
    "Almost There, Keep Going!",
    "Nice Work, You're Making Progress!",
];

const KEEP_PRACTICING_MESSAGES: [&str; 8] = [
    "Keep Practicing!",
    "Don't Give Up!",
    "You're Making Progress!",
    "Try Again, You're Learning!",
    "Keep Working On It!",
    "Practice Makes Perfect!",
    "You're Doing Great, Just Keep Trying!",
    "Don't Get Discouraged, You'll Improve!",
];

/// Splits a story into the sentences read one turn at a time.
///
/// A sentence ends at `.`, `!` or `?` followed by one or more spaces. Other
/// whitespace never splits, and pieces left blank are dropped.
pub fn split_sentences(story: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut prev = None;
    let mut chars = story.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c == ' ' && matches!(prev, Some('.' | '!' | '?')) {
            let mut end = idx + 1;
            while let Some(&(next_idx, ' ')) = chars.peek() {
                end = next_idx + 1;
                chars.next();
            }
            push_sentence(&mut sentences, &story[start..idx]);
            start = end;
        }
        prev = Some(c);
    }
    push_sentence(&mut sentences, &story[start..]);
    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece);
    }
}

/// Correct and expected word counters; accuracy is a percentage of the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionAccuracy {
    pub total_correct_words: usize,
    pub total_expected_words: usize,
}

impl SessionAccuracy {
    pub fn record(&mut self, correct_words: usize, expected_words: usize) {
        self.total_correct_words += correct_words;
        self.total_expected_words += expected_words;
    }

    pub fn percent(&self) -> f64 {
        if self.total_expected_words == 0 {
            return 0.0;
        }
        self.total_correct_words as f64 / self.total_expected_words as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReadingSpeed {
    pub words_read: usize,
    pub reading_time: Duration,
}

impl ReadingSpeed {
    pub fn record(&mut self, words: usize, elapsed: Duration) {
        self.words_read += words;
        self.reading_time += elapsed;
    }

    pub fn words_per_minute(&self) -> f64 {
        let secs = self.reading_time.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.words_read as f64 / secs * 60.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyTier {
    Excellent,
    Good,
    Improving,
    KeepPracticing,
}

impl AccuracyTier {
    pub fn from_accuracy(accuracy_percent: f64) -> Self {
        if accuracy_percent >= 90.0 {
            Self::Excellent
        } else if accuracy_percent >= 75.0 {
            Self::Good
        } else if accuracy_percent >= 60.0 {
            Self::Improving
        } else {
            Self::KeepPracticing
        }
    }

    pub fn messages(self) -> &'static [&'static str] {
        match self {
            Self::Excellent => &EXCELLENT_MESSAGES,
            Self::Good => &GOOD_MESSAGES,
            Self::Improving => &IMPROVING_MESSAGES,
            Self::KeepPracticing => &KEEP_PRACTICING_MESSAGES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Improving => "improving",
            Self::KeepPracticing => "keep_practicing",
        }
    }
}

/// One to five stars for a session accuracy percentage.
pub fn star_rating(accuracy_percent: f64) -> u8 {
    if accuracy_percent >= 90.0 {
        5
    } else if accuracy_percent >= 75.0 {
        4
    } else if accuracy_percent >= 60.0 {
        3
    } else if accuracy_percent >= 40.0 {
        2
    } else {
        1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub turns: usize,
    pub total_correct_words: usize,
    pub total_expected_words: usize,
    pub accuracy_percent: f64,
    pub words_per_minute: f64,
    pub stars: u8,
    pub tier: AccuracyTier,
}

impl SessionSummary {
    pub fn encouragement<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        let messages = self.tier.messages();
        messages.choose(rng).copied().unwrap_or(messages[0])
    }
}

/// Row handed to the statistics store at the end of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub student_id: String,
    pub average_speed_wpm: f64,
    pub average_accuracy: f64,
    pub date: NaiveDate,
}

impl SessionStats {
    pub fn from_summary(
        student_id: impl Into<String>,
        summary: &SessionSummary,
        date: NaiveDate,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            average_speed_wpm: round_one_decimal(summary.words_per_minute),
            average_accuracy: round_one_decimal(summary.accuracy_percent),
            date,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone)]
pub struct ReadingSession {
    correct_threshold: f32,
    accuracy: SessionAccuracy,
    speed: ReadingSpeed,
    turns: usize,
    active: bool,
}

impl ReadingSession {
    pub fn new(correct_threshold: f32) -> Self {
        Self {
            correct_threshold,
            accuracy: SessionAccuracy::default(),
            speed: ReadingSpeed::default(),
            turns: 0,
            active: true,
        }
    }

    /// Adds one scored sentence and the time spent reading it.
    pub fn record_turn(&mut self, output: &ScoringOutput, elapsed: Duration) {
        if !self.active {
            tracing::warn!("session: turn recorded after the session ended; reopening");
            self.active = true;
        }
        let correct = count_correct(&output.words, self.correct_threshold);
        let expected = output.words.len();
        self.accuracy.record(correct, expected);
        self.speed.record(expected, elapsed);
        self.turns += 1;
        tracing::debug!(
            turn = self.turns,
            correct,
            expected,
            elapsed_ms = elapsed.as_millis() as u64,
            "session: recorded turn"
        );
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn counters(&self) -> SessionAccuracy {
        self.accuracy
    }

    /// Accuracy percentage, only available once the session has ended.
    pub fn accuracy(&self) -> Option<f64> {
        if self.active {
            None
        } else {
            Some(self.accuracy.percent())
        }
    }

    pub fn words_per_minute(&self) -> f64 {
        self.speed.words_per_minute()
    }

    /// Ends the session and finalizes its accuracy.
    pub fn finish(&mut self) -> SessionSummary {
        self.active = false;
        let accuracy_percent = self.accuracy.percent();
        SessionSummary {
            turns: self.turns,
            total_correct_words: self.accuracy.total_correct_words,
            total_expected_words: self.accuracy.total_expected_words,
            accuracy_percent,
            words_per_minute: self.speed.words_per_minute(),
            stars: star_rating(accuracy_percent),
            tier: AccuracyTier::from_accuracy(accuracy_percent),
        }
    }
}
