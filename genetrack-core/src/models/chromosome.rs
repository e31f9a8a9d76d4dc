#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::read::Read;

///
/// All reads of one chromosome, sorted by strictly increasing position.
///
#[derive(Eq, PartialEq, Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChromosomeBlock {
    pub chrom: String,
    pub reads: Vec<Read>,
}

impl ChromosomeBlock {
    pub fn new(chrom: &str) -> Self {
        ChromosomeBlock {
            chrom: chrom.to_string(),
            reads: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    ///
    /// Lowest and highest read position, or `None` for an empty block.
    ///
    pub fn span(&self) -> Option<(i64, i64)> {
        match (self.reads.first(), self.reads.last()) {
            (Some(first), Some(last)) => Some((first.position, last.position)),
            _ => None,
        }
    }

    ///
    /// Reads whose position lies in `[start, end]` (both inclusive).
    ///
    pub fn window(&self, start: i64, end: i64) -> &[Read] {
        read_window(&self.reads, start, end)
    }
}

///
/// Binary search a position-sorted slice for the reads in `[start, end]`.
///
pub fn read_window(reads: &[Read], start: i64, end: i64) -> &[Read] {
    if start > end {
        return &reads[0..0];
    }
    let lo = reads.partition_point(|read| read.position < start);
    let hi = reads.partition_point(|read| read.position <= end);
    &reads[lo..hi]
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn block() -> ChromosomeBlock {
        ChromosomeBlock {
            chrom: "chr1".to_string(),
            reads: vec![
                Read::with_counts(10, 1, 0),
                Read::with_counts(20, 0, 2),
                Read::with_counts(30, 3, 1),
                Read::with_counts(45, 1, 1),
            ],
        }
    }

    #[rstest]
    fn test_span(block: ChromosomeBlock) {
        assert_eq!(block.span(), Some((10, 45)));
        assert_eq!(ChromosomeBlock::new("chr2").span(), None);
    }

    #[rstest]
    #[case(10, 30, vec![10, 20, 30])]
    #[case(11, 29, vec![20])]
    #[case(0, 9, vec![])]
    #[case(46, 100, vec![])]
    #[case(30, 20, vec![])]
    #[case(-5, 1000, vec![10, 20, 30, 45])]
    fn test_window_is_inclusive(
        block: ChromosomeBlock,
        #[case] start: i64,
        #[case] end: i64,
        #[case] expected: Vec<i64>,
    ) {
        let positions: Vec<i64> = block.window(start, end).iter().map(|r| r.position).collect();
        assert_eq!(positions, expected);
    }
}
