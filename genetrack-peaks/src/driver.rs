//! File-level processing: sequential or per-chromosome parallel calling of one input,
//! plus the helpers a batch run over many inputs needs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{info, warn};
use rayon::prelude::*;

use genetrack_core::utils::{get_dynamic_reader, get_dynamic_reader_w_stdin, remove_all_extensions};
use genetrack_io::{BedGraphTracks, ChromosomeReader, OutputFormat, PeakWriter};

use crate::caller::{CallSummary, ChromosomePeaks, PeakCaller, call_peaks, call_peaks_with_tracks};
use crate::config::PeakCallerConfig;
use crate::consts::DEFAULT_THREADS;

/// How a single input is processed and written.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub format: OutputFormat,
    pub threads: usize,
    /// Directory for `forward.bedgraph` / `reverse.bedgraph`, when tracks are wanted.
    pub bedgraph_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            format: OutputFormat::GFF,
            threads: DEFAULT_THREADS,
            bedgraph_dir: None,
        }
    }
}

///
/// Call every chromosome of `path` on a pool of `threads` workers.
///
/// The file is read once to list (and validate the grouping of) its chromosomes, then
/// each worker reopens it restricted to one chromosome. Results come back in file order
/// together with the read size of the detected layout.
///
pub fn call_chromosomes_parallel(
    path: &Path,
    config: &PeakCallerConfig,
    threads: usize,
) -> Result<(Vec<ChromosomePeaks>, i64)> {
    let caller = PeakCaller::new(config.clone())?;

    let mut chromosomes = ChromosomeReader::new(get_dynamic_reader(path)?)
        .chromosome_names()
        .with_context(|| format!("Failed to list chromosomes of {}", path.display()))?;
    if let Some(only) = &config.restrict_chromosome {
        chromosomes.retain(|c| c == only);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to build thread pool")?;

    let bar = ProgressBar::new(chromosomes.len() as u64);
    let results: Vec<(ChromosomePeaks, i64)> = pool.install(|| {
        chromosomes
            .par_iter()
            .map(|chrom| -> Result<(ChromosomePeaks, i64)> {
                let mut reader = ChromosomeReader::new(get_dynamic_reader(path)?)
                    .with_chromosome(Some(chrom));
                let called = match reader.next() {
                    Some(block) => caller.call_chromosome(&block?),
                    None => ChromosomePeaks {
                        chrom: chrom.clone(),
                        peaks: Vec::new(),
                        chunks: 0,
                    },
                };
                bar.inc(1);
                Ok((called, reader.read_size()))
            })
            .collect::<Result<Vec<_>>>()
    })?;
    bar.finish_and_clear();

    let read_size = results.first().map_or(0, |(_, size)| *size);
    Ok((results.into_iter().map(|(called, _)| called).collect(), read_size))
}

///
/// Call peaks on one input (a path, or `-` for stdin) and write them to `out`.
///
pub fn process_file<W: Write>(
    input: &str,
    out: W,
    config: &PeakCallerConfig,
    options: &RunOptions,
) -> Result<CallSummary> {
    let mut writer = PeakWriter::new(out, options.format);

    if let Some(dir) = &options.bedgraph_dir {
        if options.threads > 1 {
            warn!("bedGraph output is written sequentially, ignoring --threads");
        }
        let mut tracks = BedGraphTracks::create(dir)
            .with_context(|| format!("Failed to create bedGraph tracks in {}", dir.display()))?;
        let summary = call_peaks_with_tracks(
            get_dynamic_reader_w_stdin(input)?,
            &mut writer,
            &mut tracks,
            config,
        )
        .with_context(|| format!("Failed to call peaks on {}", input))?;
        return Ok(summary);
    }

    if options.threads > 1 && input != "-" {
        let (called, read_size) =
            call_chromosomes_parallel(Path::new(input), config, options.threads)
                .with_context(|| format!("Failed to call peaks on {}", input))?;

        writer.write_header()?;
        let mut summary = CallSummary::default();
        for chromosome in &called {
            writer.write_peaks(&chromosome.chrom, &chromosome.peaks, read_size)?;
            summary.add(chromosome);
        }
        writer.flush()?;
        return Ok(summary);
    }

    let summary = call_peaks(get_dynamic_reader_w_stdin(input)?, &mut writer, config)
        .with_context(|| format!("Failed to call peaks on {}", input))?;
    Ok(summary)
}

///
/// Process one input file into `output`, creating the file.
///
pub fn process_file_to_path(
    input: &Path,
    output: &Path,
    config: &PeakCallerConfig,
    options: &RunOptions,
) -> Result<CallSummary> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create output file {}", output.display()))?;
    let input_str = input.to_string_lossy();

    info!(
        "Calling peaks on {} with sigma={} min_separation={}",
        input_str, config.sigma, config.min_separation
    );
    let summary = process_file(&input_str, BufWriter::new(file), config, options)?;
    info!(
        "{}: {} peak(s) on {} chromosome(s) in {} chunk(s), written to {}",
        input_str,
        summary.peaks,
        summary.chromosomes,
        summary.chunks,
        output.display()
    );
    Ok(summary)
}

///
/// Output path for an input in batch mode: `<stem>.s<sigma>e<min_separation>.<ext>`,
/// next to the input unless `out_dir` is given.
///
pub fn get_output_path(
    input: &Path,
    out_dir: Option<&Path>,
    config: &PeakCallerConfig,
    format: OutputFormat,
) -> PathBuf {
    let name = format!(
        "{}.s{}e{}.{}",
        remove_all_extensions(input),
        config.sigma,
        config.min_separation,
        format.extension()
    );
    match out_dir.or_else(|| input.parent()) {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

///
/// Expand directories into the regular files directly inside them (sorted by name).
/// Plain paths are passed through.
///
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && !is_hidden(p))
                .collect();
            files.sort();
            inputs.extend(files);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}
