//! Streaming, chromosome-at-a-time reader for chromosome-grouped input.
//!
//! Only one chromosome's reads are held in memory. The reader looks one record ahead to
//! find where a chromosome ends; that lookahead is validated before the finished block is
//! handed out, so a chromosome that reappears later in the file is reported before any
//! work is done on the block in front of it.

use std::collections::HashSet;
use std::io::BufRead;

use log::{debug, info, warn};

use genetrack_core::InvalidFileError;
use genetrack_core::models::{ChromosomeBlock, Read};

use crate::schema::{DetectedFormat, Record, RecordError, detect_schema};

struct PendingRecord {
    chrom: String,
    /// `None` for records of a chromosome the reader skips; those are not parsed.
    record: Option<Record>,
    line: usize,
}

/// Accumulates records of a single chromosome into position-unique reads.
struct BlockBuilder {
    block: ChromosomeBlock,
}

impl BlockBuilder {
    fn new(chrom: &str) -> Self {
        BlockBuilder {
            block: ChromosomeBlock::new(chrom),
        }
    }

    fn push(&mut self, pending: PendingRecord) -> Result<(), InvalidFileError> {
        let (record, line) = match pending.record {
            Some(record) => (record, pending.line),
            None => return Ok(()),
        };
        let position = record.position();
        match self.block.reads.last().map(|read| read.position) {
            Some(previous) if previous > position => {
                return Err(InvalidFileError::UnsortedReads {
                    chrom: self.block.chrom.clone(),
                    position,
                    previous,
                    line,
                });
            }
            Some(previous) if previous == position => {}
            _ => self.block.reads.push(Read::new(position)),
        }

        if let Some(current) = self.block.reads.last_mut() {
            match record {
                Record::Counts {
                    forward, reverse, ..
                } => current.merge(&Read::with_counts(position, forward, reverse)),
                Record::Event { strand, .. } => current.add(strand, 1),
            }
        }
        Ok(())
    }

    fn finish(self) -> ChromosomeBlock {
        self.block
    }
}

///
/// Iterator over the [`ChromosomeBlock`]s of a chromosome-grouped, position-sorted input.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use genetrack_io::ChromosomeReader;
///
/// let data = "chr1\t10\t1\t0\nchr1\t12\t0\t2\nchr2\t5\t1\t1\n";
/// let blocks: Vec<_> = ChromosomeReader::new(Cursor::new(data))
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].chrom, "chr1");
/// assert_eq!(blocks[0].reads.len(), 2);
/// ```
pub struct ChromosomeReader<R> {
    reader: R,
    buf: String,
    line_number: usize,
    format: Option<DetectedFormat>,
    skipped_lines: usize,
    pending: Option<PendingRecord>,
    closed: HashSet<String>,
    restrict: Option<String>,
    done: bool,
}

impl<R: BufRead> ChromosomeReader<R> {
    pub fn new(reader: R) -> Self {
        ChromosomeReader {
            reader,
            buf: String::new(),
            line_number: 0,
            format: None,
            skipped_lines: 0,
            pending: None,
            closed: HashSet::new(),
            restrict: None,
            done: false,
        }
    }

    ///
    /// Only yield the named chromosome. Other chromosomes are read past without keeping
    /// their reads, and iteration stops right after the requested one.
    ///
    pub fn with_chromosome(mut self, chrom: Option<&str>) -> Self {
        self.restrict = chrom.map(|c| c.to_string());
        self
    }

    /// The layout detected from the first parseable record, once one has been read.
    pub fn format(&self) -> Option<DetectedFormat> {
        self.format
    }

    /// Read size of the detected layout, 0 before detection.
    pub fn read_size(&self) -> i64 {
        self.format.map_or(0, |f| f.read_size)
    }

    ///
    /// Consume the input and return every chromosome name in file order, checking that
    /// the file is grouped by chromosome along the way.
    ///
    pub fn chromosome_names(mut self) -> Result<Vec<String>, InvalidFileError> {
        let mut names: Vec<String> = Vec::new();
        while let Some(next) = self.next_record()? {
            if names.last() == Some(&next.chrom) {
                continue;
            }
            if !self.closed.insert(next.chrom.clone()) {
                return Err(InvalidFileError::ChromosomeNotGrouped {
                    chrom: next.chrom,
                    line: next.line,
                });
            }
            names.push(next.chrom);
        }
        Ok(names)
    }

    fn next_record(&mut self) -> Result<Option<PendingRecord>, InvalidFileError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buf.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();

            let format = match self.format {
                Some(format) => format,
                None => match detect_schema(&fields) {
                    Some(format) => {
                        if self.skipped_lines > 0 {
                            info!("Skipped initial {} line(s) of file", self.skipped_lines);
                        }
                        debug!("{} format detected", format.schema);
                        self.format = Some(format);
                        format
                    }
                    None => {
                        warn!(
                            "Line {} does not match any known format, skipping: {}",
                            self.line_number, line
                        );
                        self.skipped_lines += 1;
                        continue;
                    }
                },
            };

            let chrom = fields[0].trim();
            if !self.wants(chrom) {
                format.schema.check_field_count(&fields).map_err(|e| {
                    InvalidFileError::MalformedRecord {
                        schema: format.schema.name(),
                        line: self.line_number,
                        reason: e.to_string(),
                    }
                })?;
                return Ok(Some(PendingRecord {
                    chrom: chrom.to_string(),
                    record: None,
                    line: self.line_number,
                }));
            }

            let record = format.schema.parse(&fields).map_err(|e| match e {
                RecordError::Malformed(reason) => InvalidFileError::MalformedRecord {
                    schema: format.schema.name(),
                    line: self.line_number,
                    reason,
                },
                RecordError::InvalidStrand { strand, position } => {
                    InvalidFileError::InvalidStrand {
                        strand,
                        chrom: chrom.to_string(),
                        position,
                        line: self.line_number,
                    }
                }
            })?;

            return Ok(Some(PendingRecord {
                chrom: chrom.to_string(),
                record: Some(record),
                line: self.line_number,
            }));
        }
    }

    fn wants(&self, chrom: &str) -> bool {
        self.restrict.as_deref().is_none_or(|c| c == chrom)
    }

    fn read_block(&mut self) -> Result<Option<ChromosomeBlock>, InvalidFileError> {
        loop {
            let first = match self.pending.take() {
                Some(pending) => pending,
                None => match self.next_record()? {
                    Some(record) => record,
                    None => return Ok(None),
                },
            };

            if self.closed.contains(&first.chrom) {
                return Err(InvalidFileError::ChromosomeNotGrouped {
                    chrom: first.chrom,
                    line: first.line,
                });
            }

            let collect = self.wants(&first.chrom);
            let chrom = first.chrom.clone();
            let mut builder = BlockBuilder::new(&chrom);
            builder.push(first)?;

            while let Some(next) = self.next_record()? {
                if next.chrom == chrom {
                    builder.push(next)?;
                    continue;
                }
                if self.closed.contains(&next.chrom) {
                    return Err(InvalidFileError::ChromosomeNotGrouped {
                        chrom: next.chrom,
                        line: next.line,
                    });
                }
                self.pending = Some(next);
                break;
            }

            self.closed.insert(chrom.clone());

            if collect {
                if self.restrict.is_some() {
                    self.done = true;
                }
                return Ok(Some(builder.finish()));
            }
            info!("Skipping chromosome {}", chrom);
        }
    }
}

impl<R: BufRead> Iterator for ChromosomeReader<R> {
    type Item = Result<ChromosomeBlock, InvalidFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use genetrack_core::models::Strand;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::schema::Schema;

    fn read_all(data: &str) -> Result<Vec<ChromosomeBlock>, InvalidFileError> {
        ChromosomeReader::new(Cursor::new(data.to_string())).collect()
    }

    #[rstest]
    fn test_position_count_blocks() {
        let blocks = read_all("chr1\t10\t1\t0\nchr1\t15\t2\t3\nchr2\t7\t0\t1\n").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0].reads,
            vec![Read::with_counts(10, 1, 0), Read::with_counts(15, 2, 3)]
        );
        assert_eq!(blocks[1].chrom, "chr2");
        assert_eq!(blocks[1].reads, vec![Read::with_counts(7, 0, 1)]);
    }

    #[rstest]
    fn test_duplicate_positions_are_merged() {
        let blocks = read_all("chr1\t10\t1\t0\nchr1\t10\t2\t5\n").unwrap();
        assert_eq!(blocks[0].reads, vec![Read::with_counts(10, 3, 5)]);
    }

    #[rstest]
    fn test_bed_events_are_aggregated() {
        let data = "\
track name=reads
chr1\t9\t45\tr1\t0\t+
chr1\t9\t45\tr2\t0\t-
chr1\t9\t45\tr3\t0\t+
chr1\t19\t55\tr4\t0\t-
";
        let mut reader = ChromosomeReader::new(Cursor::new(data));
        let block = reader.next().unwrap().unwrap();
        assert_eq!(
            block.reads,
            vec![Read::with_counts(10, 2, 1), Read::with_counts(20, 0, 1)]
        );
        assert_eq!(
            reader.format(),
            Some(DetectedFormat {
                schema: Schema::Bed,
                read_size: 36
            })
        );
        assert!(reader.next().is_none());
    }

    #[rstest]
    fn test_gff_events() {
        let data = "##gff-version 3\nchrX\tsrc\tread\t100\t135\t.\t-\t.\t.\n";
        let mut reader = ChromosomeReader::new(Cursor::new(data));
        let block = reader.next().unwrap().unwrap();
        assert_eq!(block.reads[0].count(Strand::Reverse), 1);
        assert_eq!(reader.read_size(), 36);
    }

    #[rstest]
    fn test_unsorted_positions_are_fatal() {
        let err = read_all("chr1\t20\t1\t0\nchr1\t10\t1\t0\n").unwrap_err();
        assert!(matches!(
            err,
            InvalidFileError::UnsortedReads {
                position: 10,
                previous: 20,
                line: 2,
                ..
            }
        ));
    }

    #[rstest]
    fn test_regrouped_chromosome_fails_before_second_block() {
        let mut reader = ChromosomeReader::new(Cursor::new(
            "chr1\t10\t1\t0\nchr2\t10\t1\t0\nchr1\t30\t1\t0\n",
        ));
        assert_eq!(reader.next().unwrap().unwrap().chrom, "chr1");
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            InvalidFileError::ChromosomeNotGrouped { ref chrom, line: 3 } if chrom == "chr1"
        ));
        assert!(reader.next().is_none());
    }

    #[rstest]
    fn test_invalid_strand_is_fatal() {
        let err = read_all("chr1\t9\t45\tr1\t0\t*\n").unwrap_err();
        assert!(matches!(err, InvalidFileError::InvalidStrand { .. }));
    }

    #[rstest]
    fn test_malformed_record_after_detection_is_fatal() {
        let err = read_all("chr1\t10\t1\t0\nchr1\tabc\t1\t0\n").unwrap_err();
        assert!(matches!(
            err,
            InvalidFileError::MalformedRecord { line: 2, .. }
        ));
    }

    #[rstest]
    fn test_restrict_to_chromosome() {
        let data = "chr1\t10\t1\t0\nchr2\t10\t4\t0\nchr2\t11\t1\t0\nchr3\t1\t1\t1\n";
        let blocks: Vec<ChromosomeBlock> = ChromosomeReader::new(Cursor::new(data))
            .with_chromosome(Some("chr2"))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].chrom, "chr2");
        assert_eq!(blocks[0].len(), 2);
    }

    #[rstest]
    fn test_restrict_skips_records_of_other_chromosomes() {
        let data = "\
chr1\t9\t45\tr1\t0\t+
chr1\t9\t45\tr2\t0\t*
chr2\t19\t55\tr3\t0\t-
chr3\tx\t55\tr4\t0\t+
";
        let blocks: Vec<ChromosomeBlock> = ChromosomeReader::new(Cursor::new(data))
            .with_chromosome(Some("chr2"))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].reads, vec![Read::with_counts(20, 0, 1)]);

        // layout is still checked on skipped lines
        let data = "chr1\t10\t1\t0\nchr1\t11\nchr2\t10\t1\t0\n";
        let err = ChromosomeReader::new(Cursor::new(data))
            .with_chromosome(Some("chr2"))
            .collect::<Result<Vec<ChromosomeBlock>, _>>()
            .unwrap_err();
        assert!(matches!(err, InvalidFileError::MalformedRecord { line: 2, .. }));
    }

    #[rstest]
    fn test_chromosome_names() {
        let data = "header line\nchr1\t10\t1\t0\nchr1\t12\t1\t0\nchr2\t10\t1\t0\nchrM\t3\t0\t1\n";
        let names = ChromosomeReader::new(Cursor::new(data))
            .chromosome_names()
            .unwrap();
        assert_eq!(names, vec!["chr1", "chr2", "chrM"]);
    }

    #[rstest]
    fn test_chromosome_names_rejects_ungrouped() {
        let data = "chr1\t10\t1\t0\nchr2\t10\t1\t0\nchr1\t12\t1\t0\n";
        let result = ChromosomeReader::new(Cursor::new(data)).chromosome_names();
        assert!(result.is_err());
    }
}
