//! # Peak calling for genetrack.
//!
//! Reads of one chromosome are smoothed with a gaussian [`Kernel`] into per-strand signal
//! arrays, the local maxima of each array become candidate peaks, and a greedy exclusion
//! pass keeps only the tallest peak in every `min_separation` window. Long chromosomes are
//! cut into overlap-padded [`Chunk`]s so memory stays proportional to the chunk size.
//!
//! ```rust
//! use genetrack_core::models::{ChromosomeBlock, Read};
//! use genetrack_peaks::{PeakCaller, PeakCallerConfig};
//!
//! let caller = PeakCaller::new(PeakCallerConfig::default()).unwrap();
//! let block = ChromosomeBlock {
//!     chrom: "chr1".to_string(),
//!     reads: vec![Read::with_counts(1000, 5, 0), Read::with_counts(1500, 0, 8)],
//! };
//!
//! let called = caller.call_chromosome(&block);
//! assert_eq!(called.peaks.len(), 2);
//! assert_eq!(called.peaks[0].index, 1000);
//! ```
//!
//! File-level entry points live in [`driver`]: [`process_file`] calls a single input,
//! optionally fanning chromosomes out over a thread pool.
pub mod assemble;
pub mod caller;
pub mod chunks;
pub mod config;
pub mod consts;
pub mod detect;
pub mod driver;
pub mod errors;
pub mod exclusion;
pub mod kernel;
pub mod signal;

pub use caller::{
    CallSummary, ChromosomePeaks, ChunkCandidates, PeakCaller, call_peaks, call_peaks_with_tracks,
};
pub use chunks::{Chunk, get_chunks};
pub use config::{FileOverrides, ParameterOverride, PeakCallerConfig};
pub use driver::{
    RunOptions, call_chromosomes_parallel, collect_inputs, get_output_path, process_file,
    process_file_to_path,
};
pub use errors::{ConfigError, PeakCallerError};
pub use kernel::Kernel;
pub use signal::{SignalArray, StrandSignals, build_signal, build_strand_signals};
