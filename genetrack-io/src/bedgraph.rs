use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use genetrack_core::models::Strand;

use crate::consts::{
    BEDGRAPH_MIN_VALUE, FORWARD_TRACK_FILE, FORWARD_TRACK_HEADER, REVERSE_TRACK_FILE,
    REVERSE_TRACK_HEADER,
};

///
/// A pair of bedGraph tracks holding the smoothed forward and reverse signal.
///
pub struct BedGraphTracks<W: Write> {
    forward: W,
    reverse: W,
}

impl BedGraphTracks<BufWriter<File>> {
    ///
    /// Create `forward.bedgraph` and `reverse.bedgraph` inside `dir`.
    ///
    pub fn create<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let forward = BufWriter::new(File::create(dir.join(FORWARD_TRACK_FILE))?);
        let reverse = BufWriter::new(File::create(dir.join(REVERSE_TRACK_FILE))?);
        BedGraphTracks::new(forward, reverse)
    }
}

impl<W: Write> BedGraphTracks<W> {
    /// Wrap two writers and emit the track header lines.
    pub fn new(mut forward: W, mut reverse: W) -> io::Result<Self> {
        writeln!(forward, "{}", FORWARD_TRACK_HEADER)?;
        writeln!(reverse, "{}", REVERSE_TRACK_HEADER)?;
        Ok(BedGraphTracks { forward, reverse })
    }

    ///
    /// Append the cells of one signal array that fall inside `[process.0, process.1)`.
    ///
    /// # Arguments
    /// - chrom: chromosome name
    /// - strand: which track to write to
    /// - values: the dense signal, one cell per coordinate
    /// - shift: add to a coordinate to get its cell
    /// - process: coordinate range owned by the current chunk
    /// - read_size: reverse-strand positions are moved downstream by this much
    pub fn write_signal(
        &mut self,
        chrom: &str,
        strand: Strand,
        values: &[f64],
        shift: i64,
        process: (i64, i64),
        read_size: i64,
    ) -> io::Result<()> {
        // the forward track keeps cells at the threshold, the reverse track only above it
        let (out, offset, inclusive) = match strand {
            Strand::Forward => (&mut self.forward, 0, true),
            Strand::Reverse => (&mut self.reverse, read_size, false),
        };

        for (cell, &value) in values.iter().enumerate() {
            let coordinate = cell as i64 - shift;
            let shown = if inclusive {
                value >= BEDGRAPH_MIN_VALUE
            } else {
                value > BEDGRAPH_MIN_VALUE
            };
            if coordinate < process.0 || coordinate >= process.1 || !shown {
                continue;
            }
            let position = coordinate + offset;
            writeln!(out, "{}\t{}\t{}\t{}", chrom, position, position + 1, value)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.forward.flush()?;
        self.reverse.flush()
    }

    pub fn into_inner(self) -> (W, W) {
        (self.forward, self.reverse)
    }
}
