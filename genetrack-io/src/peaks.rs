use std::fmt::{self, Display};
use std::io::{self, Write};
use std::str::FromStr;

use genetrack_core::models::{Peak, Strand};

use crate::consts::{GFF_SOURCE, GFF_VERSION_HEADER, TXT_HEADER};

/// Output formats for called peaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum OutputFormat {
    GFF,
    TXT,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::GFF => "gff",
            OutputFormat::TXT => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gff" => Ok(OutputFormat::GFF),
            "txt" => Ok(OutputFormat::TXT),
            _ => Err(format!("{} is not a valid output format (use gff or txt)", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

///
/// Writes called peaks, one line each, as GFF or tab-separated text.
///
pub struct PeakWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> PeakWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        PeakWriter { out, format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        match self.format {
            OutputFormat::GFF => writeln!(self.out, "{}", GFF_VERSION_HEADER),
            OutputFormat::TXT => writeln!(self.out, "{}", TXT_HEADER),
        }
    }

    ///
    /// Write a single peak.
    ///
    /// # Arguments
    /// - chrom: chromosome the peak was called on
    /// - peak: the peak
    /// - read_size: read size of the input layout; GFF output shifts reverse-strand
    ///   coordinates by it
    pub fn write_peak(&mut self, chrom: &str, peak: &Peak, read_size: i64) -> io::Result<()> {
        let mut start = peak.start.max(1);
        let mut end = peak.end;

        match self.format {
            OutputFormat::GFF => {
                if peak.strand == Strand::Reverse {
                    start += read_size;
                    end += read_size;
                }
                writeln!(
                    self.out,
                    "{}\t{}\t.\t{}\t{}\t{}\t{}\t.\tID={};stddev={};height={};readcount={}",
                    chrom,
                    GFF_SOURCE,
                    start,
                    end,
                    peak.height,
                    peak.strand,
                    (start + end) / 2,
                    peak.std_dev,
                    peak.height,
                    peak.read_count
                )
            }
            OutputFormat::TXT => writeln!(
                self.out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                chrom, peak.strand, start, end, peak.height, peak.read_count, peak.std_dev
            ),
        }
    }

    pub fn write_peaks(&mut self, chrom: &str, peaks: &[Peak], read_size: i64) -> io::Result<()> {
        for peak in peaks {
            self.write_peak(chrom, peak, read_size)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn peaks() -> Vec<Peak> {
        let mut forward = Peak::new(100, Strand::Forward, 10, 10, 4.5);
        forward.read_count = 5;
        forward.std_dev = 1.5;
        let mut reverse = Peak::new(5, Strand::Reverse, 10, 10, 3.25);
        reverse.read_count = 4;
        vec![forward, reverse]
    }

    fn render(format: OutputFormat, peaks: &[Peak], read_size: i64) -> Vec<String> {
        let mut writer = PeakWriter::new(Vec::new(), format);
        writer.write_header().unwrap();
        writer.write_peaks("chr1", peaks, read_size).unwrap();
        String::from_utf8(writer.into_inner())
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[rstest]
    fn test_txt_output(peaks: Vec<Peak>) {
        let lines = render(OutputFormat::TXT, &peaks, 36);
        assert_eq!(
            lines,
            vec![
                TXT_HEADER.to_string(),
                "chr1\t+\t90\t110\t4.5\t5\t1.5".to_string(),
                "chr1\t-\t1\t15\t3.25\t4\t0".to_string(),
            ]
        );
    }

    #[rstest]
    fn test_gff_output_shifts_reverse_strand(peaks: Vec<Peak>) {
        let lines = render(OutputFormat::GFF, &peaks, 36);
        assert_eq!(lines[0], GFF_VERSION_HEADER);
        assert_eq!(
            lines[1],
            "chr1\tgenetrack\t.\t90\t110\t4.5\t+\t.\tID=100;stddev=1.5;height=4.5;readcount=5"
        );
        assert_eq!(
            lines[2],
            "chr1\tgenetrack\t.\t37\t51\t3.25\t-\t.\tID=44;stddev=0;height=3.25;readcount=4"
        );
    }

    #[rstest]
    #[case("gff", OutputFormat::GFF)]
    #[case("TXT", OutputFormat::TXT)]
    fn test_parse_output_format(#[case] name: &str, #[case] expected: OutputFormat) {
        assert_eq!(name.parse::<OutputFormat>().unwrap(), expected);
    }

    #[rstest]
    fn test_parse_unknown_output_format() {
        assert!("bed".parse::<OutputFormat>().is_err());
    }
}
