//! Core data models for genetrack.
//!
//! Everything that more than one genetrack crate needs to agree on lives here: the
//! per-position [`Read`](models::Read) aggregate, the [`ChromosomeBlock`](models::ChromosomeBlock)
//! a reader produces, the [`Peak`](models::Peak) the caller emits, and the
//! [`InvalidFileError`](errors::InvalidFileError) raised on malformed input.
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::InvalidFileError;
