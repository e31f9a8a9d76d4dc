//! # Input/Output for genetrack.
//!
//! Reading: [`ChromosomeReader`] streams a chromosome-grouped tab-separated file and yields
//! one [`ChromosomeBlock`](genetrack_core::models::ChromosomeBlock) at a time. The record
//! layout is autodetected from the first parseable line using the [`Schema`] table.
//!
//! Writing: [`PeakWriter`] formats called peaks as GFF or plain text and
//! [`BedGraphTracks`] dumps the smoothed per-strand signal. Both take their coordinate
//! conventions from the same [`Schema`] table the reader uses.
//!
pub mod bedgraph;
pub mod consts;
pub mod peaks;
pub mod reader;
pub mod schema;

// re-expose core functions
pub use bedgraph::*;
pub use consts::*;
pub use peaks::*;
pub use reader::*;
pub use schema::*;
