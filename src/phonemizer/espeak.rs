use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::ScoringError;
use crate::phonemizer::clean_phoneme_output;
use crate::pipeline::traits::Phonemizer;

const BACKEND_NAME: &str = "espeak-ng";

/// Runs the system `espeak-ng` binary with IPA output.
///
/// Requires espeak-ng to be installed (`apt-get install espeak-ng`,
/// `brew install espeak-ng`).
#[derive(Debug, Clone)]
pub struct EspeakPhonemizer {
    language: String,
    binary: String,
}

impl EspeakPhonemizer {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            binary: BACKEND_NAME.to_string(),
        }
    }

    /// Use a specific executable instead of `espeak-ng` from `PATH`.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Phonemizer for EspeakPhonemizer {
    fn phonemize(&self, text: &str) -> Result<String, ScoringError> {
        // text goes through stdin so a leading '-' is never read as an option
        let mut child = Command::new(&self.binary)
            .args(["--ipa", "-q", "-v", &self.language, "--stdin"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ScoringError::phonemizer(
                    BACKEND_NAME,
                    format!("failed to run '{}' (is espeak-ng installed?): {e}", self.binary),
                )
            })?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(|e| {
                ScoringError::phonemizer(BACKEND_NAME, format!("failed to write text: {e}"))
            })?;
        }
        let output = child.wait_with_output().map_err(|e| {
            ScoringError::phonemizer(BACKEND_NAME, format!("failed to read output: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScoringError::phonemizer(
                BACKEND_NAME,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        let phonemes = clean_phoneme_output(&raw);
        if phonemes.is_empty() && text.chars().any(char::is_alphanumeric) {
            return Err(ScoringError::phonemizer(
                BACKEND_NAME,
                format!("no phonemes produced for '{text}'"),
            ));
        }
        tracing::debug!(
            language = self.language.as_str(),
            text,
            phonemes = phonemes.as_str(),
            "espeak: phonemized text"
        );
        Ok(phonemes)
    }

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }
}
