#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::strand::Strand;

///
/// Read counts aggregated at a single chromosome position.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Read {
    pub position: i64,
    pub forward: u32,
    pub reverse: u32,
}

impl Read {
    /// An empty read at `position`; counts are added with [`Read::add`].
    pub fn new(position: i64) -> Self {
        Read {
            position,
            forward: 0,
            reverse: 0,
        }
    }

    pub fn with_counts(position: i64, forward: u32, reverse: u32) -> Self {
        Read {
            position,
            forward,
            reverse,
        }
    }

    /// Count on the given strand.
    #[inline]
    pub fn count(&self, strand: Strand) -> u32 {
        match strand {
            Strand::Forward => self.forward,
            Strand::Reverse => self.reverse,
        }
    }

    /// Add `count` events on `strand`; counts saturate at `u32::MAX`.
    pub fn add(&mut self, strand: Strand, count: u32) {
        match strand {
            Strand::Forward => self.forward = self.forward.saturating_add(count),
            Strand::Reverse => self.reverse = self.reverse.saturating_add(count),
        }
    }

    /// Fold another read at the same position into this one.
    pub fn merge(&mut self, other: &Read) {
        self.forward = self.forward.saturating_add(other.forward);
        self.reverse = self.reverse.saturating_add(other.reverse);
    }
}
