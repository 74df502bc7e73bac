#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Minimum word score counted as correctly pronounced.
    pub correct_threshold: f32,
    /// Classify the last word of every sentence as mispronounced, whatever its score.
    pub flag_final_word: bool,
    /// Ignore over-represented phonemes when seeding matching blocks (difflib autojunk).
    pub autojunk: bool,
    /// espeak-ng voice used by the default phonemizer.
    pub language: String,
    /// JSON substitution table; the built-in table is used when empty.
    pub substitution_table_path: String,
}

impl ScoringConfig {
    pub const DEFAULT_CORRECT_THRESHOLD: f32 = 0.6;
    pub const DEFAULT_LANGUAGE: &'static str = "en-us";
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            correct_threshold: Self::DEFAULT_CORRECT_THRESHOLD,
            flag_final_word: true,
            autojunk: true,
            language: Self::DEFAULT_LANGUAGE.to_string(),
            substitution_table_path: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_config_default() {
        let config = ScoringConfig::default();
        assert_eq!(config.correct_threshold, 0.6);
        assert!(config.flag_final_word);
        assert!(config.autojunk);
        assert_eq!(config.language, "en-us");
        assert!(config.substitution_table_path.is_empty());
    }
}
