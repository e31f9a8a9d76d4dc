///
/// A piece of a chromosome processed on its own.
///
/// `process` is the half-open coordinate range the chunk is responsible for; `slice`
/// widens it by the kernel half-width (clamped to the chromosome span) so smoothing near
/// the edges sees every read that contributes.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub slice: (i64, i64),
    pub process: (i64, i64),
}

///
/// Split `[lo, hi]` into chunks of at most `size` coordinates with `overlap` padding.
///
/// The process ranges tile `[lo, hi)` in order; `lo == hi` yields nothing.
///
pub fn get_chunks(lo: i64, hi: i64, size: u64, overlap: i64) -> Vec<Chunk> {
    let size = size.max(1) as i64;
    let mut chunks = Vec::new();

    let mut start = lo;
    while start < hi {
        let end = (start + size).min(hi);
        chunks.push(Chunk {
            slice: ((start - overlap).max(lo), (end + overlap).min(hi)),
            process: (start, end),
        });
        start = end;
    }
    chunks
}
