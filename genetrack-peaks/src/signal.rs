use ndarray::{ArrayViewMut1, s};

use genetrack_core::models::{Read, Strand};

use crate::kernel::Kernel;

///
/// Dense smoothed read density over a coordinate range, one cell per coordinate.
///
/// Cell `i` holds the value at coordinate `i - shift`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct SignalArray {
    pub values: Vec<f64>,
    pub shift: i64,
}

impl SignalArray {
    ///
    /// A zeroed array covering `[lo - W, hi + W)`.
    ///
    pub fn zeros(lo: i64, hi: i64, half_width: usize) -> Self {
        let w = half_width as i64;
        let len = (hi - lo + 2 * w).max(0) as usize;
        SignalArray {
            values: vec![0.0; len],
            shift: w - lo,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Chromosome coordinate of a cell.
    #[inline]
    pub fn coordinate(&self, cell: usize) -> i64 {
        cell as i64 - self.shift
    }

    /// Value at a chromosome coordinate, zero outside the array.
    pub fn value_at(&self, coordinate: i64) -> f64 {
        let cell = coordinate + self.shift;
        if cell < 0 {
            return 0.0;
        }
        self.values.get(cell as usize).copied().unwrap_or(0.0)
    }

    ///
    /// Add `count × kernel` centred on `position`. Kernel cells falling off either end
    /// of the array are dropped.
    ///
    pub fn add_read(&mut self, position: i64, count: f64, kernel: &Kernel) {
        let w = kernel.half_width() as i64;
        let len = self.values.len() as i64;

        // array cells touched by kernel offsets [-w, w)
        let first = position + self.shift - w;
        let a = first.max(0);
        let b = (first + 2 * w).min(len);
        if a >= b {
            return;
        }

        let k_start = (a - first) as usize;
        let k_end = (b - first) as usize;
        let mut target = ArrayViewMut1::from(&mut self.values[a as usize..b as usize]);
        target.scaled_add(count, &kernel.weights().slice(s![k_start..k_end]));
    }
}

///
/// Smooth one strand's counts of `reads` into an array over `[lo - W, hi + W)`.
///
/// # Arguments
/// - reads: reads of the slice, sorted by position
/// - strand: which count to use
/// - kernel: the smoothing kernel, shared across chunks and strands
/// - range: `(lo, hi)` coordinate range the array covers before padding
pub fn build_signal(reads: &[Read], strand: Strand, kernel: &Kernel, range: (i64, i64)) -> SignalArray {
    let mut signal = SignalArray::zeros(range.0, range.1, kernel.half_width());
    for read in reads {
        let count = read.count(strand);
        if count > 0 {
            signal.add_read(read.position, count as f64, kernel);
        }
    }
    signal
}

/// Forward and reverse signal over the same coordinate range.
#[derive(Debug, Clone)]
pub struct StrandSignals {
    pub forward: SignalArray,
    pub reverse: SignalArray,
}

impl StrandSignals {
    pub fn get(&self, strand: Strand) -> &SignalArray {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }
}

pub fn build_strand_signals(reads: &[Read], kernel: &Kernel, range: (i64, i64)) -> StrandSignals {
    StrandSignals {
        forward: build_signal(reads, Strand::Forward, kernel, range),
        reverse: build_signal(reads, Strand::Reverse, kernel, range),
    }
}
