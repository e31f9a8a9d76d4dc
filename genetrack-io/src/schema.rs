//! Record layouts genetrack understands.
//!
//! A single table describes each layout: how many fields it has, which fields must be
//! integers for a line to match, where the position and strand live, and how the read
//! size is derived. The reader uses it for autodetection and parsing; the writers use
//! the detected read size to place reverse-strand output.

use std::fmt::{self, Display};

use thiserror::Error;

use genetrack_core::models::Strand;

/// Which fields must parse as integers for a line to match a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFields {
    /// Every field after the chromosome name.
    AllAfterChrom,
    /// The two (0-based) columns holding an interval's start and end.
    Interval(usize, usize),
}

/// How the read size is derived from a record's interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSizeRule {
    /// Single-position records carry no extent.
    Zero,
    /// Half-open interval: `end - start`.
    HalfOpen,
    /// Closed interval: `end - start + 1`.
    Closed,
}

impl ReadSizeRule {
    pub fn read_size(&self, start: i64, end: i64) -> i64 {
        match self {
            ReadSizeRule::Zero => 0,
            ReadSizeRule::HalfOpen => end - start,
            ReadSizeRule::Closed => end - start + 1,
        }
    }
}

/// Field positions and conversion rules of one input layout.
#[derive(Debug)]
pub struct SchemaLayout {
    pub name: &'static str,
    pub min_fields: usize,
    pub max_fields: Option<usize>,
    pub numeric: NumericFields,
    pub position_field: usize,
    /// Added to the position column to get a 1-based coordinate.
    pub position_offset: i64,
    /// `None` for layouts that carry per-strand counts instead of a strand column.
    pub strand_field: Option<usize>,
    pub read_size: ReadSizeRule,
}

const POSITION_COUNT_LAYOUT: SchemaLayout = SchemaLayout {
    name: "position-count",
    min_fields: 4,
    max_fields: Some(5),
    numeric: NumericFields::AllAfterChrom,
    position_field: 1,
    position_offset: 0,
    strand_field: None,
    read_size: ReadSizeRule::Zero,
};

const BED_LAYOUT: SchemaLayout = SchemaLayout {
    name: "BED",
    min_fields: 6,
    max_fields: None,
    numeric: NumericFields::Interval(1, 2),
    position_field: 1,
    position_offset: 1,
    strand_field: Some(5),
    read_size: ReadSizeRule::HalfOpen,
};

const GFF_LAYOUT: SchemaLayout = SchemaLayout {
    name: "GFF",
    min_fields: 9,
    max_fields: Some(9),
    numeric: NumericFields::Interval(3, 4),
    position_field: 3,
    position_offset: 0,
    strand_field: Some(6),
    read_size: ReadSizeRule::Closed,
};

/// Input record layouts, in the order autodetection tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// `chrom  position  forward_count  reverse_count  [value]`
    PositionCount,
    /// BED6+: `chrom  start  end  name  score  strand ...`, one read per line.
    Bed,
    /// GFF: `chrom  source  feature  start  end  score  strand  phase  attributes`.
    Gff,
}

pub const DETECTION_ORDER: [Schema; 3] = [Schema::PositionCount, Schema::Bed, Schema::Gff];

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// Aggregated counts at one position.
    Counts {
        position: i64,
        forward: u32,
        reverse: u32,
    },
    /// A single read on one strand.
    Event { position: i64, strand: Strand },
}

impl Record {
    pub fn position(&self) -> i64 {
        match self {
            Record::Counts { position, .. } => *position,
            Record::Event { position, .. } => *position,
        }
    }
}

/// Why a line could not be parsed under an already detected schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("{0}")]
    Malformed(String),

    #[error("invalid strand \"{strand}\" at position {position}")]
    InvalidStrand { strand: String, position: i64 },
}

/// Outcome of autodetection: the layout plus the read size of the first record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedFormat {
    pub schema: Schema,
    pub read_size: i64,
}

fn parse_u32(field: &str) -> Option<u32> {
    field.trim().parse::<u32>().ok()
}

impl Schema {
    pub fn layout(&self) -> &'static SchemaLayout {
        match self {
            Schema::PositionCount => &POSITION_COUNT_LAYOUT,
            Schema::Bed => &BED_LAYOUT,
            Schema::Gff => &GFF_LAYOUT,
        }
    }

    pub fn name(&self) -> &'static str {
        self.layout().name
    }

    ///
    /// Check whether `fields` fit this layout; on a match return the detected format,
    /// including the read size implied by this record.
    ///
    pub fn matches(&self, fields: &[&str]) -> Option<DetectedFormat> {
        let layout = self.layout();
        if fields.len() < layout.min_fields {
            return None;
        }
        if layout.max_fields.is_some_and(|max| fields.len() > max) {
            return None;
        }

        let read_size = match layout.numeric {
            NumericFields::AllAfterChrom => {
                if !fields[1..].iter().all(|f| parse_u32(f).is_some()) {
                    return None;
                }
                layout.read_size.read_size(0, 0)
            }
            NumericFields::Interval(start_field, end_field) => {
                let start = parse_u32(fields[start_field])? as i64;
                let end = parse_u32(fields[end_field])? as i64;
                layout.read_size.read_size(start, end)
            }
        };

        Some(DetectedFormat {
            schema: *self,
            read_size,
        })
    }

    /// Only check that the number of fields fits this layout.
    pub fn check_field_count(&self, fields: &[&str]) -> Result<(), RecordError> {
        let layout = self.layout();
        if fields.len() < layout.min_fields
            || layout.max_fields.is_some_and(|max| fields.len() > max)
        {
            return Err(RecordError::Malformed(format!(
                "expected {} fields, found {}",
                layout.min_fields,
                fields.len()
            )));
        }
        Ok(())
    }

    ///
    /// Parse a line known to belong to this layout.
    ///
    pub fn parse(&self, fields: &[&str]) -> Result<Record, RecordError> {
        self.check_field_count(fields)?;
        let layout = self.layout();

        let integer = |idx: usize| -> Result<u32, RecordError> {
            parse_u32(fields[idx]).ok_or_else(|| {
                RecordError::Malformed(format!(
                    "field {} is not a non-negative integer: {:?}",
                    idx + 1,
                    fields[idx]
                ))
            })
        };

        let position = integer(layout.position_field)? as i64 + layout.position_offset;

        match layout.strand_field {
            None => Ok(Record::Counts {
                position,
                forward: integer(2)?,
                reverse: integer(3)?,
            }),
            Some(strand_field) => {
                if let NumericFields::Interval(_, end_field) = layout.numeric {
                    integer(end_field)?;
                }
                let symbol = fields[strand_field].trim();
                let strand = symbol
                    .parse::<Strand>()
                    .map_err(|_| RecordError::InvalidStrand {
                        strand: symbol.to_string(),
                        position,
                    })?;
                Ok(Record::Event { position, strand })
            }
        }
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

///
/// Try every layout in [`DETECTION_ORDER`] and return the first that matches.
///
pub fn detect_schema(fields: &[&str]) -> Option<DetectedFormat> {
    DETECTION_ORDER
        .iter()
        .find_map(|schema| schema.matches(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn split(line: &str) -> Vec<&str> {
        line.split('\t').collect()
    }

    #[rstest]
    #[case("chr1\t100\t3\t0", Schema::PositionCount, 0)]
    #[case("chr1\t100\t3\t0\t3", Schema::PositionCount, 0)]
    #[case("chr1\t99\t135\tread1\t0\t+", Schema::Bed, 36)]
    #[case("chr1\t99\t135\tread1\t0\t-\textra\tcolumns", Schema::Bed, 36)]
    #[case("chr1\tsrc\tread\t100\t135\t.\t-\t.\t.", Schema::Gff, 36)]
    fn test_detect_schema(#[case] line: &str, #[case] schema: Schema, #[case] read_size: i64) {
        let detected = detect_schema(&split(line)).unwrap();
        assert_eq!(detected.schema, schema);
        assert_eq!(detected.read_size, read_size);
    }

    #[rstest]
    #[case("chrom\tposition\tforward\treverse")]
    #[case("track name=reads")]
    #[case("chr1\t100\t3")]
    #[case("chr1\t-5\t3\t0")]
    #[case("chr1\tsrc\tread\tstart\tend\t.\t+\t.\t.")]
    fn test_detect_schema_no_match(#[case] line: &str) {
        assert_eq!(detect_schema(&split(line)), None);
    }

    #[rstest]
    fn test_bed_is_converted_to_one_based() {
        let record = Schema::Bed
            .parse(&split("chr1\t99\t135\tread1\t0\t+"))
            .unwrap();
        assert_eq!(
            record,
            Record::Event {
                position: 100,
                strand: Strand::Forward
            }
        );
    }

    #[rstest]
    fn test_gff_position_is_kept() {
        let record = Schema::Gff
            .parse(&split("chr1\tsrc\tread\t100\t135\t.\t-\t.\t."))
            .unwrap();
        assert_eq!(
            record,
            Record::Event {
                position: 100,
                strand: Strand::Reverse
            }
        );
    }

    #[rstest]
    fn test_position_count_record() {
        let record = Schema::PositionCount
            .parse(&split("chr2\t42\t3\t7"))
            .unwrap();
        assert_eq!(
            record,
            Record::Counts {
                position: 42,
                forward: 3,
                reverse: 7
            }
        );
    }

    #[rstest]
    fn test_invalid_strand() {
        let err = Schema::Bed
            .parse(&split("chr1\t99\t135\tread1\t0\t."))
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidStrand {
                strand: ".".to_string(),
                position: 100
            }
        );
    }

    #[rstest]
    fn test_non_numeric_after_detection_is_malformed() {
        let err = Schema::PositionCount
            .parse(&split("chr1\tabc\t1\t0"))
            .unwrap_err();
        assert!(matches!(err, RecordError::Malformed(_)));
    }
}
