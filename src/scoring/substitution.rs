use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ScoringError;
use crate::types::PhonemeUnit;

/// Acoustically confusable pairs and the partial credit they earn.
const DEFAULT_PAIRS: [(char, char, f32); 15] = [
    ('a', 'ɐ', 0.9),
    ('i', 'ɪ', 0.9),
    ('u', 'ʊ', 0.9),
    ('e', 'ɛ', 0.9),
    ('o', 'ɔ', 0.9),
    ('ə', 'ʌ', 0.9),
    ('d', 't', 0.8),
    ('b', 'p', 0.8),
    ('g', 'k', 0.8),
    ('m', 'n', 0.8),
    ('f', 'v', 0.8),
    ('s', 'z', 0.8),
    ('r', 'l', 0.7),
    ('ʃ', 's', 0.7),
    ('θ', 'f', 0.7),
];

#[derive(Debug, Deserialize)]
struct SubstitutionEntry {
    a: String,
    b: String,
    weight: f32,
}

/// Symmetric phoneme-pair weights; lookups ignore pair order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionTable {
    weights: HashMap<(PhonemeUnit, PhonemeUnit), f32>,
}

impl SubstitutionTable {
    pub fn empty() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (PhonemeUnit, PhonemeUnit, f32)>,
    ) -> Result<Self, ScoringError> {
        let mut table = Self::empty();
        for (a, b, weight) in pairs {
            table.insert(a, b, weight)?;
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ScoringError::io("read substitution table", e))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, ScoringError> {
        let entries: Vec<SubstitutionEntry> = serde_json::from_str(data)
            .map_err(|e| ScoringError::json("parse substitution table", e))?;

        let mut table = Self::empty();
        for entry in entries {
            let a = single_unit(&entry.a)?;
            let b = single_unit(&entry.b)?;
            table.insert(a, b, entry.weight)?;
        }
        Ok(table)
    }

    pub fn insert(
        &mut self,
        a: PhonemeUnit,
        b: PhonemeUnit,
        weight: f32,
    ) -> Result<(), ScoringError> {
        if a == b {
            return Err(ScoringError::invalid_input(format!(
                "substitution pair pairs '{a}' with itself"
            )));
        }
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(ScoringError::invalid_input(format!(
                "substitution weight for '{a}'/'{b}' must be in (0, 1], got {weight}"
            )));
        }
        self.weights.insert(ordered(a, b), weight);
        Ok(())
    }

    pub fn weight(&self, a: PhonemeUnit, b: PhonemeUnit) -> Option<f32> {
        self.weights.get(&ordered(a, b)).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        let mut weights = HashMap::with_capacity(DEFAULT_PAIRS.len());
        for (a, b, weight) in DEFAULT_PAIRS {
            weights.insert(ordered(a, b), weight);
        }
        Self { weights }
    }
}

fn ordered(a: PhonemeUnit, b: PhonemeUnit) -> (PhonemeUnit, PhonemeUnit) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn single_unit(symbol: &str) -> Result<PhonemeUnit, ScoringError> {
    let mut it = symbol.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ScoringError::invalid_input(format!(
            "substitution symbol '{symbol}' is not a single phoneme unit"
        ))),
    }
}
