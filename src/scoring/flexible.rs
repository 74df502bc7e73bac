use crate::scoring::substitution::SubstitutionTable;
use crate::types::PhonemeUnit;

/// Greedy two-pointer similarity between expected and recorded phonemes.
///
/// Exact matches earn 1.0 and table pairs earn their weight. On a miss the
/// pointer that is proportionally further behind advances alone. The sum is
/// normalized by the longer sequence, so the result stays in [0, 1] and
/// insertions or deletions can only lower it. Two empty sequences score 0.0.
pub fn flexible_match(
    expected: &[PhonemeUnit],
    recorded: &[PhonemeUnit],
    table: &SubstitutionTable,
) -> f32 {
    let expected_len = expected.len();
    let recorded_len = recorded.len();
    let longest = expected_len.max(recorded_len);
    if longest == 0 {
        return 0.0;
    }

    let mut score_sum = 0.0f32;
    let (mut i, mut j) = (0usize, 0usize);
    while i < expected_len && j < recorded_len {
        let (e, r) = (expected[i], recorded[j]);
        if e == r {
            score_sum += 1.0;
            i += 1;
            j += 1;
        } else if let Some(weight) = table.weight(e, r) {
            score_sum += weight;
            i += 1;
            j += 1;
        } else if i * recorded_len < j * expected_len {
            // i / expected_len < j / recorded_len
            i += 1;
        } else {
            j += 1;
        }
    }

    let score = score_sum / longest as f32;
    debug_assert!((0.0..=1.0).contains(&score), "score out of range: {score}");
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(s: &str) -> Vec<PhonemeUnit> {
        s.chars().collect()
    }

    fn score(expected: &str, recorded: &str) -> f32 {
        flexible_match(&units(expected), &units(recorded), &SubstitutionTable::default())
    }

    #[test]
    fn identical_sequences_score_one() {
        assert_eq!(score("kæt", "kæt"), 1.0);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(score("kæt", ""), 0.0);
        assert_eq!(score("", "kæt"), 0.0);
        assert_eq!(score("", ""), 0.0);
    }

    #[test]
    fn voiced_voiceless_pair_earns_table_weight() {
        assert!((score("b", "p") - 0.8).abs() < 1e-6);
        assert!((score("bæt", "pæt") - (0.8 + 2.0) / 3.0).abs() < 1e-6);
    }

    #[test]
    fn table_lookup_is_symmetric() {
        assert_eq!(score("d", "t"), score("t", "d"));
        assert_eq!(score("ʃ", "s"), score("s", "ʃ"));
    }

    #[test]
    fn deletion_is_normalized_by_longer_sequence() {
        // greedy recovery skips past æ, only t is credited
        assert!((score("bæt", "æt") - 1.0 / 3.0).abs() < 1e-6);
        assert!((score("kæt", "kæ") - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn insertion_never_inflates_above_one() {
        let s = score("kæt", "kæææt");
        assert!(s < 1.0);
        assert!(s > 0.0);
    }

    #[test]
    fn desync_recovery_advances_lagging_pointer() {
        // i/3 == j/3 at the first miss, so the recorded pointer moves first
        assert!((score("kæt", "sæt") - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn unrelated_sequences_score_zero() {
        assert_eq!(score("kæt", "zzz"), 0.0);
    }

    #[test]
    fn empty_table_only_counts_exact_matches() {
        let s = flexible_match(&units("b"), &units("p"), &SubstitutionTable::empty());
        assert_eq!(s, 0.0);
    }
}
