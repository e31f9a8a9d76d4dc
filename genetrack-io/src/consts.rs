pub const GFF_VERSION_HEADER: &str = "##gff-version 3";
pub const GFF_SOURCE: &str = "genetrack";
pub const TXT_HEADER: &str = "chrom\tstrand\tstart\tend\tvalue\treadcount\tstddev";

pub const FORWARD_TRACK_FILE: &str = "forward.bedgraph";
pub const REVERSE_TRACK_FILE: &str = "reverse.bedgraph";
pub const FORWARD_TRACK_HEADER: &str = "track type=bedGraph color=200,0,0";
pub const REVERSE_TRACK_HEADER: &str = "track type=bedGraph color=0,0,200";

/// bedGraph threshold: forward cells need at least this value, reverse cells more than it.
pub const BEDGRAPH_MIN_VALUE: f64 = 0.5;
