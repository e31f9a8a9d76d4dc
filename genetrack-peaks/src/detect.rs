use genetrack_core::models::{Peak, Read, Strand, read_window};

use crate::config::PeakCallerConfig;
use crate::signal::SignalArray;

///
/// Cells that are strictly greater than both neighbours. The first and last cell are
/// never maxima; plateaus never produce one.
///
pub fn local_maxima(values: &[f64]) -> Vec<usize> {
    values
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, _)| i + 1)
        .collect()
}

///
/// Fill in `read_count` and `std_dev` of a peak from the strand-specific counts of the
/// reads lying in `[peak.start, peak.end]`.
///
pub fn score_peak(peak: &mut Peak, reads: &[Read]) {
    let window = read_window(reads, peak.start, peak.end);

    let mut total = 0u64;
    let mut weighted = 0.0;
    for read in window {
        let count = read.count(peak.strand) as u64;
        total += count;
        weighted += count as f64 * read.position as f64;
    }

    if total == 0 {
        peak.read_count = 0;
        peak.std_dev = 0.0;
        return;
    }

    let mean = weighted / total as f64;
    let variance = window
        .iter()
        .map(|read| {
            let d = read.position as f64 - mean;
            read.count(peak.strand) as f64 * d * d
        })
        .sum::<f64>()
        / total as f64;

    peak.read_count = total.min(u32::MAX as u64) as u32;
    peak.std_dev = variance.sqrt();
}

///
/// Turn every local maximum of `signal` into a scored candidate peak.
///
pub fn detect_peaks(
    signal: &SignalArray,
    reads: &[Read],
    strand: Strand,
    config: &PeakCallerConfig,
) -> Vec<Peak> {
    let upstream = config.upstream_width();
    let downstream = config.downstream_width();

    local_maxima(&signal.values)
        .into_iter()
        .map(|cell| {
            let mut peak = Peak::new(
                signal.coordinate(cell),
                strand,
                upstream,
                downstream,
                signal.values[cell],
            );
            score_peak(&mut peak, reads);
            peak
        })
        .collect()
}
