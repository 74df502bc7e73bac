use std::collections::HashMap;
use std::path::Path;

use crate::error::ScoringError;
use crate::phonemizer::clean_phoneme_output;
use crate::pipeline::traits::Phonemizer;

const BACKEND_NAME: &str = "lexicon";

/// Pronunciation lookup from a fixed word list.
///
/// Keys are matched lowercased with surrounding punctuation trimmed. Tokens
/// that are pure punctuation produce no group; any other unknown word fails.
#[derive(Debug, Clone, Default)]
pub struct LexiconPhonemizer {
    entries: HashMap<String, String>,
}

impl LexiconPhonemizer {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut lexicon = Self::default();
        for (word, phonemes) in entries {
            lexicon.insert(word.as_ref(), phonemes);
        }
        lexicon
    }

    /// Loads a JSON object mapping words to phoneme strings.
    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| ScoringError::io("read lexicon", e))?;
        let raw: HashMap<String, String> =
            serde_json::from_str(&data).map_err(|e| ScoringError::json("parse lexicon", e))?;
        Ok(Self::new(raw))
    }

    pub fn insert(&mut self, word: &str, phonemes: impl Into<String>) {
        let key = normalize_word(word);
        if key.is_empty() {
            return;
        }
        self.entries.insert(key, phonemes.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Phonemizer for LexiconPhonemizer {
    fn phonemize(&self, text: &str) -> Result<String, ScoringError> {
        let mut groups = Vec::new();
        for word in text.split_whitespace() {
            let key = normalize_word(word);
            if key.is_empty() {
                continue;
            }
            let phonemes = self.entries.get(&key).ok_or_else(|| {
                ScoringError::phonemizer(BACKEND_NAME, format!("no pronunciation for '{word}'"))
            })?;
            let group: String = clean_phoneme_output(phonemes)
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            groups.push(group);
        }
        Ok(groups.join(" "))
    }

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }
}

fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}
