use thiserror::Error;

/// Fatal problems with an input file. None of these are recoverable for the current run.
#[derive(Error, Debug)]
pub enum InvalidFileError {
    #[error(
        "Reads in chromosome {chrom} are not sorted by position (position {position} after {previous}, line {line})"
    )]
    UnsortedReads {
        chrom: String,
        position: i64,
        previous: i64,
        line: usize,
    },

    #[error("File is not grouped by chromosome: {chrom} reappears at line {line}")]
    ChromosomeNotGrouped { chrom: String, line: usize },

    #[error("Strand \"{strand}\" at chromosome {chrom} position {position} is not valid (line {line})")]
    InvalidStrand {
        strand: String,
        chrom: String,
        position: i64,
        line: usize,
    },

    #[error("Line {line} is not a valid {schema} record: {reason}")]
    MalformedRecord {
        schema: &'static str,
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
