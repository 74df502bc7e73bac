use std::path::Path;

use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::phonemizer::EspeakPhonemizer;
use crate::pipeline::defaults::{BlockMatchingSegmentAligner, FlexiblePhonemeScorer};
use crate::pipeline::runtime::{ReadingScorer, ReadingScorerParts};
use crate::pipeline::traits::{PhonemeRecognizer, PhonemeScorer, Phonemizer, SegmentAligner};
use crate::scoring::substitution::SubstitutionTable;

pub struct ReadingScorerBuilder {
    config: ScoringConfig,
    phonemizer: Option<Box<dyn Phonemizer>>,
    segment_aligner: Option<Box<dyn SegmentAligner>>,
    phoneme_scorer: Option<Box<dyn PhonemeScorer>>,
    recognizer: Option<Box<dyn PhonemeRecognizer>>,
}

impl ReadingScorerBuilder {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            phonemizer: None,
            segment_aligner: None,
            phoneme_scorer: None,
            recognizer: None,
        }
    }

    pub fn with_phonemizer(mut self, phonemizer: Box<dyn Phonemizer>) -> Self {
        self.phonemizer = Some(phonemizer);
        self
    }

    pub fn with_segment_aligner(mut self, segment_aligner: Box<dyn SegmentAligner>) -> Self {
        self.segment_aligner = Some(segment_aligner);
        self
    }

    pub fn with_phoneme_scorer(mut self, phoneme_scorer: Box<dyn PhonemeScorer>) -> Self {
        self.phoneme_scorer = Some(phoneme_scorer);
        self
    }

    pub fn with_recognizer(mut self, recognizer: Box<dyn PhonemeRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn build(self) -> Result<ReadingScorer, ScoringError> {
        let threshold = self.config.correct_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ScoringError::invalid_input(format!(
                "correct_threshold must be in [0, 1], got {threshold}"
            )));
        }

        let phoneme_scorer = match self.phoneme_scorer {
            Some(phoneme_scorer) => phoneme_scorer,
            None => {
                let table = load_substitution_table(&self.config.substitution_table_path)?;
                Box::new(FlexiblePhonemeScorer::new(table))
            }
        };

        let phonemizer = self.phonemizer.unwrap_or_else(|| {
            let language = if self.config.language.is_empty() {
                ScoringConfig::DEFAULT_LANGUAGE
            } else {
                self.config.language.as_str()
            };
            Box::new(EspeakPhonemizer::new(language))
        });
        tracing::info!(
            phonemizer = phonemizer.name(),
            threshold,
            flag_final_word = self.config.flag_final_word,
            "reading scorer ready"
        );

        Ok(ReadingScorer::from_parts(ReadingScorerParts {
            phonemizer,
            segment_aligner: self
                .segment_aligner
                .unwrap_or_else(|| Box::new(BlockMatchingSegmentAligner::new(self.config.autojunk))),
            phoneme_scorer,
            recognizer: self.recognizer,
            correct_threshold: threshold,
            flag_final_word: self.config.flag_final_word,
        }))
    }
}

fn load_substitution_table(path: &str) -> Result<SubstitutionTable, ScoringError> {
    if path.is_empty() {
        return Ok(SubstitutionTable::default());
    }
    let table = SubstitutionTable::load(Path::new(path))?;
    if table.is_empty() {
        tracing::warn!(path, "substitution table is empty; only exact matches earn credit");
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use crate::phonemizer::LexiconPhonemizer;

    use super::*;

    fn lexicon() -> Box<LexiconPhonemizer> {
        Box::new(LexiconPhonemizer::new([("bat", "bæt"), ("pat", "pæt")]))
    }

    #[test]
    fn builder_defaults_follow_config() {
        let builder = ReadingScorerBuilder::new(ScoringConfig::default());
        assert!(builder.phonemizer.is_none());
        assert!(builder.recognizer.is_none());
        let scorer = builder.build().expect("default build");
        assert_eq!(scorer.phonemizer_name(), "espeak-ng");
        assert_eq!(scorer.correct_threshold(), 0.6);
        assert!(scorer.flag_final_word());
    }

    #[test]
    fn build_rejects_out_of_range_threshold() {
        let config = ScoringConfig {
            correct_threshold: 1.5,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            ReadingScorerBuilder::new(config).build(),
            Err(ScoringError::InvalidInput { .. })
        ));
    }

    struct OneGroupPhonemizer;

    impl Phonemizer for OneGroupPhonemizer {
        fn phonemize(&self, _text: &str) -> Result<String, ScoringError> {
            Ok("bæt".to_string())
        }

        fn name(&self) -> &'static str {
            "one-group"
        }
    }

    #[test]
    fn build_loads_substitution_table_from_path() {
        let path = std::env::temp_dir().join("reading_tutor_rs_builder_table.json");
        std::fs::write(&path, r#"[{"a": "b", "b": "p", "weight": 0.5}]"#).expect("write table");
        let config = ScoringConfig {
            substitution_table_path: path.to_string_lossy().to_string(),
            ..ScoringConfig::default()
        };
        let scorer = ReadingScorerBuilder::new(config)
            .with_phonemizer(Box::new(OneGroupPhonemizer))
            .build()
            .expect("build should succeed");
        // the final word is scored from the leftover "pæt" against "bæt"
        let out = scorer.compare("a bat", "bætpæt").unwrap();
        assert_eq!(out.words[0].score, 1.0);
        assert!((out.words[1].score - 2.5 / 3.0).abs() < 1e-6);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn build_fails_on_missing_substitution_table() {
        let config = ScoringConfig {
            substitution_table_path: "/nonexistent/substitutions.json".to_string(),
            ..ScoringConfig::default()
        };
        let result = ReadingScorerBuilder::new(config)
            .with_phonemizer(lexicon())
            .build();
        assert!(matches!(result, Err(ScoringError::Io { .. })));
    }

    #[test]
    fn custom_scorer_skips_table_loading() {
        let config = ScoringConfig {
            substitution_table_path: "/nonexistent/substitutions.json".to_string(),
            ..ScoringConfig::default()
        };
        let result = ReadingScorerBuilder::new(config)
            .with_phonemizer(lexicon())
            .with_phoneme_scorer(Box::new(FlexiblePhonemeScorer::default()))
            .build();
        assert!(result.is_ok());
    }
}
