//! # genetrack
//!
//! Peak calling for chromosome-grouped sequencing read data. The pieces live in separate
//! crates and are re-exported here behind features:
//!
//! - `core`: read, strand, chromosome and peak models, plus file reader helpers
//! - `io`: format autodetection, the chromosome reader and the peak / bedGraph writers
//! - `peaks`: the smoothing, detection and exclusion engine and file-level drivers
//!
#[cfg(feature = "core")]
#[doc(inline)]
pub use genetrack_core as core;

#[cfg(feature = "io")]
#[doc(inline)]
pub use genetrack_io as io;

#[cfg(feature = "peaks")]
#[doc(inline)]
pub use genetrack_peaks as peaks;
