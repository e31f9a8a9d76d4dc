use genetrack_core::models::Peak;

///
/// Greedy, height-descending suppression of peaks within `radius` of a taller one.
///
/// `peaks` must be one strand's candidates in ascending index order. Every peak, tallest
/// first, is marked safe and removes each non-safe peak with an index in
/// `[index - radius, index + radius]`. A peak that was itself removed earlier still
/// removes its neighbours, so every survivor is the tallest peak within `radius` of itself.
/// Removals are recorded in a separate mask, the index-sorted list is only read during
/// the pass. Survivors come back in index order with `safe` set.
///
pub fn suppress_neighbors(peaks: Vec<Peak>, radius: i64) -> Vec<Peak> {
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    // stable: equal heights keep index order
    order.sort_by(|&a, &b| peaks[b].height.total_cmp(&peaks[a].height));

    let mut safe = vec![false; peaks.len()];
    let mut removed = vec![false; peaks.len()];

    for i in order {
        safe[i] = true;

        let index = peaks[i].index;
        let lo = peaks.partition_point(|p| p.index < index - radius);
        let hi = peaks.partition_point(|p| p.index <= index + radius);
        for j in lo..hi {
            if !safe[j] {
                removed[j] = true;
            }
        }
    }

    peaks
        .into_iter()
        .zip(removed)
        .filter(|(_, removed)| !removed)
        .map(|(mut peak, _)| {
            peak.safe = true;
            peak
        })
        .collect()
}

/// Drop peaks whose height does not exceed `threshold`.
pub fn filter_by_height(peaks: Vec<Peak>, threshold: f64) -> Vec<Peak> {
    peaks.into_iter().filter(|p| p.height > threshold).collect()
}
