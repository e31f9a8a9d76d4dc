use genetrack_core::models::Peak;

///
/// Keep peaks inside the chunk's half-open process range `[start, end)`.
///
/// Adjacent process ranges share an endpoint, so every index belongs to exactly one chunk
/// and a maximum sitting on a chunk boundary is neither lost nor emitted twice.
///
pub fn clip_to_process(peaks: Vec<Peak>, process: (i64, i64)) -> Vec<Peak> {
    peaks
        .into_iter()
        .filter(|p| process.0 <= p.index && p.index < process.1)
        .collect()
}

/// Merge two index-ordered strands into one list, forward before reverse at the same index.
pub fn merge_strands(forward: Vec<Peak>, reverse: Vec<Peak>) -> Vec<Peak> {
    let mut merged = Vec::with_capacity(forward.len() + reverse.len());
    let mut forward = forward.into_iter().peekable();
    let mut reverse = reverse.into_iter().peekable();
    loop {
        let take_forward = match (forward.peek(), reverse.peek()) {
            (Some(f), Some(r)) => f.index <= r.index,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_forward {
            forward.next()
        } else {
            reverse.next()
        };
        merged.extend(next);
    }
    merged
}
