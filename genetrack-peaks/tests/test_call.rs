use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::tempdir;

use genetrack_core::InvalidFileError;
use genetrack_io::{OutputFormat, PeakWriter};
use genetrack_peaks::{
    CallSummary, PeakCallerConfig, PeakCallerError, RunOptions, call_peaks, process_file,
};

#[fixture]
fn path_to_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests/data")
}

fn call_txt(path: PathBuf, config: &PeakCallerConfig) -> (Result<CallSummary, PeakCallerError>, String) {
    let input = BufReader::new(File::open(path).unwrap());
    let mut writer = PeakWriter::new(Vec::new(), OutputFormat::TXT);
    let result = call_peaks(input, &mut writer, config);
    (result, String::from_utf8(writer.into_inner()).unwrap())
}

/// (chrom, strand, start, end, readcount) of every peak line.
fn peak_columns(text: &str) -> Vec<(String, String, i64, i64, u32)> {
    text.lines()
        .skip(1)
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            (
                fields[0].to_string(),
                fields[1].to_string(),
                fields[2].parse().unwrap(),
                fields[3].parse().unwrap(),
                fields[5].parse().unwrap(),
            )
        })
        .collect()
}

fn expected_peaks() -> Vec<(String, String, i64, i64, u32)> {
    [
        ("chr1", "+", 91, 111, 7),
        ("chr1", "-", 390, 410, 6),
        ("chr2", "+", 40, 60, 4),
        ("chr2", "-", 40, 60, 4),
    ]
    .iter()
    .map(|&(c, s, a, b, n)| (c.to_string(), s.to_string(), a, b, n))
    .collect()
}

#[rstest]
fn test_position_count_input(path_to_data: PathBuf) {
    let (result, text) = call_txt(path_to_data.join("reads.idx"), &PeakCallerConfig::default());
    let summary = result.unwrap();

    assert_eq!(summary.chromosomes, 2);
    assert_eq!(summary.peaks, 4);
    assert_eq!(text.lines().next(), Some("chrom\tstrand\tstart\tend\tvalue\treadcount\tstddev"));
    assert_eq!(peak_columns(&text), expected_peaks());

    // reads at 100 (x5) and 102 (x2) merge into one apex at 101
    let first: Vec<&str> = text.lines().nth(1).unwrap().split('\t').collect();
    let height: f64 = first[4].parse().unwrap();
    assert!((height - 7.0 * (-0.02f64).exp()).abs() < 1e-12);
}

#[rstest]
#[case("reads.bed")]
#[case("reads.gff")]
fn test_interval_inputs_match_position_counts(path_to_data: PathBuf, #[case] file: &str) {
    let config = PeakCallerConfig::default();
    let (expected, expected_text) = call_txt(path_to_data.join("reads.idx"), &config);
    let (result, text) = call_txt(path_to_data.join(file), &config);

    assert_eq!(result.unwrap(), expected.unwrap());
    assert_eq!(text, expected_text);
}

#[rstest]
fn test_gff_output_shifts_reverse_strand(path_to_data: PathBuf) {
    let mut out = Vec::new();
    let options = RunOptions::default();
    let input = path_to_data.join("reads.bed");
    process_file(
        &input.to_string_lossy(),
        &mut out,
        &PeakCallerConfig::default(),
        &options,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "##gff-version 3");
    assert_eq!(lines.len(), 5);

    let forward: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(&forward[..5], &["chr1", "genetrack", ".", "91", "111"]);
    assert_eq!(forward[6], "+");
    assert!(forward[8].starts_with("ID=101;"));

    // read size 30
    let reverse: Vec<&str> = lines[2].split('\t').collect();
    assert_eq!(&reverse[3..5], &["420", "440"]);
    assert_eq!(reverse[6], "-");
    assert!(reverse[8].starts_with("ID=430;"));
    assert!(reverse[8].ends_with(";readcount=6"));
}

#[rstest]
fn test_gzipped_input(path_to_data: PathBuf) {
    let config = PeakCallerConfig::default();
    let options = RunOptions {
        format: OutputFormat::TXT,
        ..Default::default()
    };

    let mut plain = Vec::new();
    let mut gzipped = Vec::new();
    process_file(
        &path_to_data.join("reads.idx").to_string_lossy(),
        &mut plain,
        &config,
        &options,
    )
    .unwrap();
    process_file(
        &path_to_data.join("reads.idx.gz").to_string_lossy(),
        &mut gzipped,
        &config,
        &options,
    )
    .unwrap();

    assert_eq!(plain, gzipped);
}

#[rstest]
fn test_chunked_run_matches_single_chunk(path_to_data: PathBuf) {
    let (whole, whole_text) = call_txt(path_to_data.join("reads.idx"), &PeakCallerConfig::default());
    let (chunked, chunked_text) = call_txt(
        path_to_data.join("reads.idx"),
        &PeakCallerConfig {
            chunk_size: 100,
            ..Default::default()
        },
    );

    assert_eq!(whole.unwrap().chunks, 2);
    assert!(chunked.unwrap().chunks > 2);
    assert_eq!(whole_text, chunked_text);
}

#[rstest]
fn test_regrouped_chromosome_stops_before_chr2(path_to_data: PathBuf) {
    let (result, text) = call_txt(path_to_data.join("ungrouped.idx"), &PeakCallerConfig::default());

    assert!(matches!(
        result,
        Err(PeakCallerError::InvalidFile(InvalidFileError::ChromosomeNotGrouped { ref chrom, .. })) if chrom == "chr1"
    ));
    assert!(text.contains("chr1\t+\t"));
    assert!(!text.contains("chr2"));
}

#[rstest]
fn test_unsorted_input_is_fatal(path_to_data: PathBuf) {
    let (result, text) = call_txt(path_to_data.join("unsorted.idx"), &PeakCallerConfig::default());
    assert!(matches!(
        result,
        Err(PeakCallerError::InvalidFile(InvalidFileError::UnsortedReads {
            position: 200,
            previous: 300,
            line: 3,
            ..
        }))
    ));
    assert_eq!(text.lines().count(), 1);
}

#[rstest]
fn test_invalid_strand_is_fatal(path_to_data: PathBuf) {
    let (result, _) = call_txt(path_to_data.join("bad_strand.bed"), &PeakCallerConfig::default());
    assert!(matches!(
        result,
        Err(PeakCallerError::InvalidFile(InvalidFileError::InvalidStrand { ref strand, line: 2, .. })) if strand == "*"
    ));
}

#[rstest]
fn test_restrict_chromosome(path_to_data: PathBuf) {
    let config = PeakCallerConfig {
        restrict_chromosome: Some("chr2".to_string()),
        ..Default::default()
    };
    let (result, text) = call_txt(path_to_data.join("reads.idx"), &config);

    assert_eq!(result.unwrap().chromosomes, 1);
    assert_eq!(peak_columns(&text), expected_peaks()[2..].to_vec());
}

#[rstest]
fn test_bedgraph_tracks(path_to_data: PathBuf) {
    let dir = tempdir().unwrap();
    let options = RunOptions {
        format: OutputFormat::TXT,
        threads: 1,
        bedgraph_dir: Some(dir.path().to_path_buf()),
    };
    let mut out = Vec::new();
    process_file(
        &path_to_data.join("reads.bed").to_string_lossy(),
        &mut out,
        &PeakCallerConfig::default(),
        &options,
    )
    .unwrap();

    let forward = std::fs::read_to_string(dir.path().join("forward.bedgraph")).unwrap();
    let reverse = std::fs::read_to_string(dir.path().join("reverse.bedgraph")).unwrap();
    assert!(forward.starts_with("track type=bedGraph"));
    assert!(reverse.starts_with("track type=bedGraph"));

    // the unit read at chr1:1000 is below the peak filter but still in the signal
    assert!(forward.contains("chr1\t1000\t1001\t1\n"));
    // reverse-strand cells move downstream by the read size
    assert!(reverse.contains("chr1\t430\t431\t6\n"));
    assert_eq!(String::from_utf8(out).unwrap(), {
        let (_, text) = call_txt(path_to_data.join("reads.bed"), &PeakCallerConfig::default());
        text
    });
}
