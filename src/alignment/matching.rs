use std::collections::{HashMap, HashSet};

use crate::types::PhonemeUnit;

/// Streams at least this long have over-represented units excluded from match seeding.
const AUTOJUNK_MIN_LEN: usize = 200;

/// `expected[a..a + size] == recognized[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

impl MatchingBlock {
    fn new(a: usize, b: usize, size: usize) -> Self {
        Self { a, b, size }
    }
}

/// Longest-matching-block diff between two phoneme streams.
///
/// Produces the same blocks as difflib's `SequenceMatcher` without a junk
/// predicate: the longest common run is found first and the regions on each
/// side of it are matched recursively. Ties go to the earliest run in
/// `expected`, then the earliest in `recognized`.
pub struct BlockMatcher<'a> {
    expected: &'a [PhonemeUnit],
    recognized: &'a [PhonemeUnit],
    positions: HashMap<PhonemeUnit, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    pub fn new(expected: &'a [PhonemeUnit], recognized: &'a [PhonemeUnit], autojunk: bool) -> Self {
        let mut positions: HashMap<PhonemeUnit, Vec<usize>> = HashMap::new();
        for (j, &unit) in recognized.iter().enumerate() {
            positions.entry(unit).or_default().push(j);
        }

        let n = recognized.len();
        if autojunk && n >= AUTOJUNK_MIN_LEN {
            let max_occurrences = n / 100 + 1;
            let popular: HashSet<PhonemeUnit> = positions
                .iter()
                .filter(|(_, idx)| idx.len() > max_occurrences)
                .map(|(&unit, _)| unit)
                .collect();
            if !popular.is_empty() {
                tracing::debug!(
                    popular_units = popular.len(),
                    recognized_len = n,
                    "matching: excluding popular units from block seeding"
                );
            }
            positions.retain(|unit, _| !popular.contains(unit));
        }

        Self {
            expected,
            recognized,
            positions,
        }
    }

    /// Longest run `expected[i..i+k] == recognized[j..j+k]` inside the given windows.
    pub fn find_longest_match(
        &self,
        a_lo: usize,
        a_hi: usize,
        b_lo: usize,
        b_hi: usize,
    ) -> MatchingBlock {
        let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0usize);
        // run length of the match ending at recognized[j], for the previous row of `expected`
        let mut run_len: HashMap<usize, usize> = HashMap::new();

        for i in a_lo..a_hi {
            let mut next_run_len: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.positions.get(&self.expected[i]) {
                for &j in js {
                    if j < b_lo {
                        continue;
                    }
                    if j >= b_hi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_len = next_run_len;
        }

        // Popular units never seed a match but may still extend one.
        while best_i > a_lo
            && best_j > b_lo
            && self.expected[best_i - 1] == self.recognized[best_j - 1]
        {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < a_hi
            && best_j + best_size < b_hi
            && self.expected[best_i + best_size] == self.recognized[best_j + best_size]
        {
            best_size += 1;
        }

        MatchingBlock::new(best_i, best_j, best_size)
    }

    /// Sorted, merged matching blocks terminated by the `(len_a, len_b, 0)` sentinel.
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let la = self.expected.len();
        let lb = self.recognized.len();

        let mut pending = vec![(0usize, la, 0usize, lb)];
        let mut found = Vec::new();
        while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
            let block = self.find_longest_match(a_lo, a_hi, b_lo, b_hi);
            if block.size == 0 {
                continue;
            }
            if a_lo < block.a && b_lo < block.b {
                pending.push((a_lo, block.a, b_lo, block.b));
            }
            if block.a + block.size < a_hi && block.b + block.size < b_hi {
                pending.push((block.a + block.size, a_hi, block.b + block.size, b_hi));
            }
            found.push(block);
        }
        found.sort_by_key(|block| (block.a, block.b, block.size));

        let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
        for block in found {
            if let Some(last) = merged.last_mut() {
                if last.a + last.size == block.a && last.b + last.size == block.b {
                    last.size += block.size;
                    continue;
                }
            }
            merged.push(block);
        }
        merged.push(MatchingBlock::new(la, lb, 0));
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(s: &str) -> Vec<PhonemeUnit> {
        s.chars().collect()
    }

    fn blocks(a: &str, b: &str) -> Vec<(usize, usize, usize)> {
        let a = units(a);
        let b = units(b);
        BlockMatcher::new(&a, &b, true)
            .matching_blocks()
            .into_iter()
            .map(|m| (m.a, m.b, m.size))
            .collect()
    }

    #[test]
    fn identical_streams_give_one_block() {
        assert_eq!(blocks("ðəkæt", "ðəkæt"), vec![(0, 0, 5), (5, 5, 0)]);
    }

    #[test]
    fn empty_recognized_gives_only_sentinel() {
        assert_eq!(blocks("kæt", ""), vec![(3, 0, 0)]);
    }

    #[test]
    fn difflib_reference_blocks() {
        // difflib.SequenceMatcher(None, "abxcd", "abcd").get_matching_blocks()
        assert_eq!(blocks("abxcd", "abcd"), vec![(0, 0, 2), (3, 2, 2), (5, 4, 0)]);
        // difflib.SequenceMatcher(None, "qabxcd", "abycdf").get_matching_blocks()
        assert_eq!(
            blocks("qabxcd", "abycdf"),
            vec![(1, 0, 2), (4, 3, 2), (6, 6, 0)]
        );
    }

    #[test]
    fn ties_prefer_earliest_expected_run() {
        let a = units("abab");
        let b = units("ab");
        let block = BlockMatcher::new(&a, &b, false).find_longest_match(0, 4, 0, 2);
        assert_eq!(block, MatchingBlock::new(0, 0, 2));
    }

    #[test]
    fn substitution_splits_blocks() {
        assert_eq!(blocks("bæt", "pæt"), vec![(1, 1, 2), (3, 3, 0)]);
    }

    #[test]
    fn autojunk_still_extends_through_popular_units() {
        // 'ə' is popular in a 300-unit recognized stream but the block still covers it
        let recognized: String = "ə".repeat(290) + "kæt" + "əəəəəəə";
        let expected = "kætə";
        let a = units(expected);
        let b = units(&recognized);
        let blocks = BlockMatcher::new(&a, &b, true).matching_blocks();
        assert_eq!(blocks[0], MatchingBlock::new(0, 290, 4));
    }

    #[test]
    fn adjacent_blocks_are_merged() {
        let a = units("abcabc");
        let b = units("abcabc");
        let blocks = BlockMatcher::new(&a, &b, true).matching_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].size, 6);
    }
}
