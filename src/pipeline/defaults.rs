use crate::alignment::matching::BlockMatcher;
use crate::alignment::segments::aligned_segment;
use crate::pipeline::traits::{PhonemeScorer, SegmentAligner};
use crate::scoring::flexible::flexible_match;
use crate::scoring::substitution::SubstitutionTable;
use crate::types::{PhonemeUnit, WordPhonemeSpan};

pub struct BlockMatchingSegmentAligner {
    autojunk: bool,
}

impl BlockMatchingSegmentAligner {
    pub fn new(autojunk: bool) -> Self {
        Self { autojunk }
    }
}

impl Default for BlockMatchingSegmentAligner {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SegmentAligner for BlockMatchingSegmentAligner {
    fn align_segments(
        &self,
        expected: &[PhonemeUnit],
        recognized: &[PhonemeUnit],
        spans: &[WordPhonemeSpan],
    ) -> Vec<Vec<PhonemeUnit>> {
        let blocks = BlockMatcher::new(expected, recognized, self.autojunk).matching_blocks();
        tracing::debug!(
            expected_len = expected.len(),
            recognized_len = recognized.len(),
            block_count = blocks.len() - 1,
            "alignment: computed matching blocks"
        );
        spans
            .iter()
            .map(|span| aligned_segment(&blocks, recognized, span.start, span.end))
            .collect()
    }
}

#[derive(Default)]
pub struct FlexiblePhonemeScorer {
    table: SubstitutionTable,
}

impl FlexiblePhonemeScorer {
    pub fn new(table: SubstitutionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SubstitutionTable {
        &self.table
    }
}

impl PhonemeScorer for FlexiblePhonemeScorer {
    fn score(&self, expected: &[PhonemeUnit], recorded: &[PhonemeUnit]) -> f32 {
        flexible_match(expected, recorded, &self.table)
    }
}
