use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use libtest_mimic::{Arguments, Failed, Trial};
use reading_tutor_rs::{
    Phonemizer, ReadingScorer, ReadingScorerBuilder, ScoringConfig, ScoringError,
};
use serde::Deserialize;

const DEFAULT_TOLERANCE: f32 = 1e-4;
const SUITE_NAME: &str = "reference_scores_match_within_tolerance";

#[derive(Debug, Deserialize)]
struct ScoringCase {
    id: String,
    expected_text: String,
    /// Phonemizer output for `expected_text`, one group per word.
    phonemes: String,
    recognized: String,
    #[serde(default = "default_flag_final_word")]
    flag_final_word: bool,
    expected_scores: Vec<f32>,
    #[serde(default)]
    expected_verdicts: Option<Vec<String>>,
    #[serde(default)]
    tolerance: Option<f32>,
}

fn default_flag_final_word() -> bool {
    true
}

/// Replays the recorded phonemizer output for one case.
struct RecordedPhonemizer {
    phonemes: String,
}

impl Phonemizer for RecordedPhonemizer {
    fn phonemize(&self, _text: &str) -> Result<String, ScoringError> {
        Ok(self.phonemes.clone())
    }

    fn name(&self) -> &'static str {
        "recorded"
    }
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let cases = match load_cases(&repo_root.join("test-data/scoring/reference_scores.json")) {
        Ok(cases) => cases,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if cases.is_empty() {
        run_setup_failure(
            &args,
            "No reference cases found under test-data/scoring.".to_string(),
        );
        return;
    }

    let tests = cases
        .into_iter()
        .map(|case| {
            let test_name = format!("{SUITE_NAME}::case::{}", case.id);
            Trial::test(test_name, move || run_case(&case).map_err(Failed::from))
        })
        .collect();

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn run_case(case: &ScoringCase) -> Result<(), String> {
    let scorer = build_scorer(case)?;
    let output = scorer
        .compare(&case.expected_text, &case.recognized)
        .map_err(|err| format!("{}: compare() failed: {err}", case.id))?;

    let word_count = case.expected_text.split_whitespace().count();
    if output.words.len() != word_count {
        return Err(format!(
            "{}: expected {word_count} word score(s), got {}",
            case.id,
            output.words.len()
        ));
    }
    if case.expected_scores.len() != word_count {
        return Err(format!(
            "{}: fixture lists {} score(s) for {word_count} word(s)",
            case.id,
            case.expected_scores.len()
        ));
    }

    let tolerance = case.tolerance.unwrap_or(DEFAULT_TOLERANCE);
    let mut mismatches = Vec::new();
    for (idx, (actual, &expected)) in output.words.iter().zip(&case.expected_scores).enumerate() {
        if !(0.0..=1.0).contains(&actual.score) {
            mismatches.push(format!(
                "word[{idx}] '{}' score {:.4} outside [0, 1]",
                actual.word, actual.score
            ));
        } else if (actual.score - expected).abs() > tolerance {
            mismatches.push(format!(
                "word[{idx}] '{}' score {:.4} != expected {:.4}",
                actual.word, actual.score, expected
            ));
        }
    }

    if let Some(expected_verdicts) = case.expected_verdicts.as_ref() {
        let assessments = scorer.assess(&output);
        for (assessment, expected) in assessments.iter().zip(expected_verdicts) {
            if assessment.verdict.as_str() != expected {
                mismatches.push(format!(
                    "word[{}] '{}' verdict {} != expected {expected}",
                    assessment.index,
                    assessment.word,
                    assessment.verdict.as_str()
                ));
            }
        }
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(format!("{}:\n  {}", case.id, mismatches.join("\n  ")))
    }
}

fn build_scorer(case: &ScoringCase) -> Result<ReadingScorer, String> {
    let config = ScoringConfig {
        flag_final_word: case.flag_final_word,
        ..ScoringConfig::default()
    };
    ReadingScorerBuilder::new(config)
        .with_phonemizer(Box::new(RecordedPhonemizer {
            phonemes: case.phonemes.clone(),
        }))
        .build()
        .map_err(|err| format!("{}: failed to build scorer: {err}", case.id))
}

fn load_cases(path: &Path) -> Result<Vec<ScoringCase>, String> {
    if !path.exists() {
        return Err(format!(
            "Missing scoring fixture JSON. Missing path: {}",
            path.display()
        ));
    }
    let file = File::open(path)
        .map_err(|err| format!("Failed to open fixture '{}': {err}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| format!("Failed to parse fixture '{}': {err}", path.display()))
}
