use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::strand::Strand;

///
/// A called peak: a local maximum of the smoothed read density on one strand.
///
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Peak {
    /// Position of the apex.
    pub index: i64,
    pub start: i64,
    pub end: i64,
    /// Smoothed signal value at the apex.
    pub height: f64,
    /// Raw strand-specific reads in `[start, end]`.
    pub read_count: u32,
    /// Read-count-weighted standard deviation of those reads' positions.
    pub std_dev: f64,
    pub strand: Strand,
    /// Set once the peak survives exclusion.
    pub safe: bool,
}

impl Peak {
    ///
    /// Create an unscored peak at `index`.
    ///
    /// `upstream` and `downstream` are given in 5'→3' terms; the reverse strand runs the
    /// other way along the coordinate axis, so its widths are swapped.
    ///
    pub fn new(index: i64, strand: Strand, upstream: i64, downstream: i64, height: f64) -> Self {
        let (before, after) = match strand {
            Strand::Forward => (upstream, downstream),
            Strand::Reverse => (downstream, upstream),
        };
        Peak {
            index,
            start: index - before,
            end: index + after,
            height,
            read_count: 0,
            std_dev: 0.0,
            strand,
            safe: false,
        }
    }

    pub fn width(&self) -> i64 {
        self.end - self.start
    }
}

impl Display for Peak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}{}] {}-{} height={} reads={}",
            self.strand, self.index, self.start, self.end, self.height, self.read_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_forward_widths() {
        let peak = Peak::new(100, Strand::Forward, 5, 15, 2.0);
        assert_eq!((peak.start, peak.end), (95, 115));
        assert_eq!(peak.width(), 20);
        assert!(!peak.safe);
    }

    #[rstest]
    fn test_reverse_widths_are_swapped() {
        let peak = Peak::new(100, Strand::Reverse, 5, 15, 2.0);
        assert_eq!((peak.start, peak.end), (85, 105));
    }
}
