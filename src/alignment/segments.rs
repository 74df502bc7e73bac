use crate::alignment::matching::MatchingBlock;
use crate::types::{PhonemeUnit, WordPhonemeSpan};

/// Strips all whitespace from a phoneme string and splits it into units.
pub fn phoneme_units(phonemes: &str) -> Vec<PhonemeUnit> {
    phonemes.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Pairs expected words with phonemizer groups, zipped to the shorter of the two.
pub fn build_word_spans(words: &[&str], groups: &[&str]) -> Vec<WordPhonemeSpan> {
    let mut spans = Vec::with_capacity(words.len().min(groups.len()));
    let mut start = 0usize;
    for (word, group) in words.iter().zip(groups.iter()) {
        let phonemes = phoneme_units(group);
        let end = start + phonemes.len();
        spans.push(WordPhonemeSpan {
            word: (*word).to_string(),
            phonemes,
            start,
            end,
        });
        start = end;
    }
    spans
}

/// Recognized units whose matching blocks overlap `[start, end)` of the expected stream.
pub fn aligned_segment(
    blocks: &[MatchingBlock],
    recognized: &[PhonemeUnit],
    start: usize,
    end: usize,
) -> Vec<PhonemeUnit> {
    let mut segment = Vec::new();
    for block in blocks {
        if block.a + block.size > start && block.a < end {
            let overlap_start = block.a.max(start);
            let overlap_end = (block.a + block.size).min(end);
            let from = block.b + (overlap_start - block.a);
            let to = block.b + (overlap_end - block.a);
            segment.extend_from_slice(&recognized[from..to]);
        }
    }
    segment
}
