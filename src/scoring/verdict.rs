use crate::types::{WordAssessment, WordScore, WordVerdict};

/// Applies the correctness threshold and the final-word policy to one turn's scores.
///
/// `expected_words` is the sentence split on whitespace; words without a score
/// entry are `NotDetected`. With `flag_final_word` the last word of the
/// sentence is never `Correct`.
pub fn assess_words(
    scores: &[WordScore],
    expected_words: &[&str],
    threshold: f32,
    flag_final_word: bool,
) -> Vec<WordAssessment> {
    let last_index = expected_words.len().saturating_sub(1);
    expected_words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let Some(scored) = scores.get(index) else {
                return WordAssessment {
                    index,
                    word: (*word).to_string(),
                    score: 0.0,
                    verdict: WordVerdict::NotDetected,
                };
            };
            let is_final = flag_final_word && index == last_index;
            let verdict = if scored.score >= threshold && !is_final {
                WordVerdict::Correct
            } else {
                WordVerdict::Mispronounced
            };
            WordAssessment {
                index,
                word: scored.word.clone(),
                score: scored.score,
                verdict,
            }
        })
        .collect()
}

/// One feedback line per expected word, matched to scores by position.
pub fn feedback(scores: &[WordScore], expected_words: &[&str], threshold: f32) -> String {
    expected_words
        .iter()
        .enumerate()
        .map(|(index, word)| match scores.get(index) {
            Some(scored) if scored.score >= threshold => format!(
                "The word '{word}' was pronounced correctly (confidence: {:.2}).",
                scored.score
            ),
            Some(scored) => format!(
                "The word '{word}' may have been mispronounced (confidence: {:.2}).",
                scored.score
            ),
            None => format!("The word '{word}' was not detected in the recording."),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The sentence with every word that is not `Correct` wrapped in `{incorrect}` tags.
pub fn highlight_markup(assessments: &[WordAssessment]) -> String {
    assessments
        .iter()
        .map(|a| match a.verdict {
            WordVerdict::Correct => a.word.clone(),
            WordVerdict::Mispronounced | WordVerdict::NotDetected => {
                format!("{{incorrect}}{}{{/incorrect}}", a.word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of words at or above the threshold, without the final-word policy.
pub fn count_correct(scores: &[WordScore], threshold: f32) -> usize {
    scores.iter().filter(|w| w.score >= threshold).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f32)]) -> Vec<WordScore> {
        pairs
            .iter()
            .map(|&(word, score)| WordScore {
                word: word.to_string(),
                score,
            })
            .collect()
    }

    #[test]
    fn final_word_is_flagged_even_when_perfect() {
        let s = scores(&[("The", 1.0), ("cat", 1.0), ("sat.", 1.0)]);
        let words = ["The", "cat", "sat."];
        let assessed = assess_words(&s, &words, 0.6, true);
        assert_eq!(assessed[0].verdict, WordVerdict::Correct);
        assert_eq!(assessed[1].verdict, WordVerdict::Correct);
        assert_eq!(assessed[2].verdict, WordVerdict::Mispronounced);
        assert_eq!(assessed[2].score, 1.0);
    }

    #[test]
    fn final_word_policy_can_be_disabled() {
        let s = scores(&[("The", 1.0), ("cat", 1.0), ("sat.", 1.0)]);
        let assessed = assess_words(&s, &["The", "cat", "sat."], 0.6, false);
        assert!(assessed.iter().all(|a| a.verdict == WordVerdict::Correct));
    }

    #[test]
    fn threshold_is_inclusive() {
        let s = scores(&[("a", 0.6), ("b", 0.59), ("c", 1.0)]);
        let assessed = assess_words(&s, &["a", "b", "c"], 0.6, false);
        assert_eq!(assessed[0].verdict, WordVerdict::Correct);
        assert_eq!(assessed[1].verdict, WordVerdict::Mispronounced);
    }

    #[test]
    fn missing_scores_are_not_detected() {
        let s = scores(&[("a", 1.0)]);
        let assessed = assess_words(&s, &["a", "b"], 0.6, false);
        assert_eq!(assessed[1].verdict, WordVerdict::NotDetected);
        assert_eq!(assessed[1].word, "b");
    }

    #[test]
    fn feedback_lines_follow_threshold_only() {
        let s = scores(&[("The", 0.95), ("cat", 0.4)]);
        let text = feedback(&s, &["The", "cat", "sat."], 0.6);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "The word 'The' was pronounced correctly (confidence: 0.95).",
                "The word 'cat' may have been mispronounced (confidence: 0.40).",
                "The word 'sat.' was not detected in the recording.",
            ]
        );
    }

    #[test]
    fn feedback_handles_repeated_words_by_position() {
        let s = scores(&[("the", 1.0), ("dog", 1.0), ("the", 0.0)]);
        let text = feedback(&s, &["the", "dog", "the"], 0.6);
        assert!(text.lines().nth(2).unwrap().contains("mispronounced"));
    }

    #[test]
    fn markup_wraps_incorrect_words() {
        let s = scores(&[("The", 1.0), ("cat", 0.2), ("sat.", 1.0)]);
        let assessed = assess_words(&s, &["The", "cat", "sat."], 0.6, true);
        assert_eq!(
            highlight_markup(&assessed),
            "The {incorrect}cat{/incorrect} {incorrect}sat.{/incorrect}"
        );
    }

    #[test]
    fn count_correct_ignores_final_word_policy() {
        let s = scores(&[("The", 1.0), ("cat", 0.2), ("sat.", 1.0)]);
        assert_eq!(count_correct(&s, 0.6), 2);
    }
}
