use std::convert::Infallible;
use std::io::{BufRead, Write};

use log::{debug, info, warn};

use genetrack_core::models::{ChromosomeBlock, Peak, Read, Strand, read_window};
use genetrack_io::{BedGraphTracks, ChromosomeReader, PeakWriter};

use crate::assemble::{clip_to_process, merge_strands};
use crate::chunks::{Chunk, get_chunks};
use crate::config::PeakCallerConfig;
use crate::detect::detect_peaks;
use crate::errors::{ConfigError, PeakCallerError};
use crate::exclusion::{filter_by_height, suppress_neighbors};
use crate::kernel::Kernel;
use crate::signal::{StrandSignals, build_strand_signals};

/// Peaks called on one chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomePeaks {
    pub chrom: String,
    pub peaks: Vec<Peak>,
    pub chunks: usize,
}

/// Unsuppressed candidate peaks of one chunk, clipped to its process range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkCandidates {
    pub forward: Vec<Peak>,
    pub reverse: Vec<Peak>,
}

/// Totals of a run over one input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallSummary {
    pub chromosomes: usize,
    pub chunks: usize,
    pub peaks: usize,
}

impl CallSummary {
    pub fn add(&mut self, called: &ChromosomePeaks) {
        self.chromosomes += 1;
        self.chunks += called.chunks;
        self.peaks += called.peaks.len();
    }
}

///
/// The peak calling engine: a validated config plus the kernel built from it.
///
/// Chromosomes are smoothed one chunk at a time. Each chunk's signal is built over its
/// overlap-padded slice and the candidates inside the chunk's process range are kept.
/// Exclusion and the height filter then run per strand over the candidates of the whole
/// chromosome, so the result does not depend on where the chunk boundaries fall.
///
#[derive(Debug, Clone)]
pub struct PeakCaller {
    config: PeakCallerConfig,
    kernel: Kernel,
}

impl PeakCaller {
    pub fn new(config: PeakCallerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let kernel = Kernel::new(config.sigma, config.kernel_half_width() as usize);
        Ok(PeakCaller { config, kernel })
    }

    pub fn config(&self) -> &PeakCallerConfig {
        &self.config
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    ///
    /// Chunks covering a chromosome's reads. The span is widened by the kernel half-width
    /// on both sides so the whole signal of the first and last read is covered.
    ///
    pub fn chunks(&self, block: &ChromosomeBlock) -> Vec<Chunk> {
        let w = self.config.kernel_half_width();
        match block.span() {
            Some((first, last)) => get_chunks(first - w, last + w, self.config.chunk_size, w),
            None => Vec::new(),
        }
    }

    ///
    /// Detect the candidates of one chunk. `reads` are all reads of the chromosome; the
    /// signal only sees those inside the chunk's slice, while scoring may look past it.
    ///
    pub fn call_chunk(&self, reads: &[Read], chunk: &Chunk) -> (ChunkCandidates, StrandSignals) {
        let slice_reads = read_window(reads, chunk.slice.0, chunk.slice.1);
        let signals = build_strand_signals(slice_reads, &self.kernel, chunk.slice);

        let detect = |strand: Strand| {
            let found = detect_peaks(signals.get(strand), reads, strand, &self.config);
            clip_to_process(found, chunk.process)
        };
        let candidates = ChunkCandidates {
            forward: detect(Strand::Forward),
            reverse: detect(Strand::Reverse),
        };
        (candidates, signals)
    }

    ///
    /// Exclusion then height filter over one strand's candidates, in index order, of a
    /// whole chromosome.
    ///
    pub fn select_peaks(&self, candidates: Vec<Peak>, strand: Strand) -> Vec<Peak> {
        let found = candidates.len();

        let kept = suppress_neighbors(candidates, self.config.exclusion_radius());
        if found > 0 {
            debug!(
                "{} strand: {} of {} candidates survive exclusion ({:.1}%)",
                strand,
                kept.len(),
                found,
                100.0 * kept.len() as f64 / found as f64
            );
        }
        filter_by_height(kept, self.config.height_filter)
    }

    ///
    /// Call every chunk of a chromosome, handing each chunk and its signal to `visit`
    /// before moving on. Peaks come back in index order.
    ///
    pub fn call_chromosome_with<F, E>(
        &self,
        block: &ChromosomeBlock,
        mut visit: F,
    ) -> Result<ChromosomePeaks, E>
    where
        F: FnMut(&Chunk, &StrandSignals) -> Result<(), E>,
    {
        let chunks = self.chunks(block);
        let mut forward = Vec::new();
        let mut reverse = Vec::new();

        for chunk in &chunks {
            if block.window(chunk.slice.0, chunk.slice.1).is_empty() {
                info!(
                    "Skipping chromosome {} indexes {}-{}: no reads",
                    block.chrom, chunk.process.0, chunk.process.1
                );
                continue;
            }
            info!(
                "Processing chromosome {} indexes {}-{}",
                block.chrom, chunk.process.0, chunk.process.1
            );

            let (candidates, signals) = self.call_chunk(&block.reads, chunk);
            visit(chunk, &signals)?;
            forward.extend(candidates.forward);
            reverse.extend(candidates.reverse);
        }

        let forward = self.select_peaks(forward, Strand::Forward);
        let reverse = self.select_peaks(reverse, Strand::Reverse);
        Ok(ChromosomePeaks {
            chrom: block.chrom.clone(),
            peaks: merge_strands(forward, reverse),
            chunks: chunks.len(),
        })
    }

    pub fn call_chromosome(&self, block: &ChromosomeBlock) -> ChromosomePeaks {
        match self.call_chromosome_with(block, |_, _| Ok::<(), Infallible>(())) {
            Ok(called) => called,
            Err(e) => match e {},
        }
    }
}

///
/// Call peaks on a chromosome-grouped input and write them as they are found.
///
/// Each chromosome is written once it is complete, so a grouping error further down the
/// input never leaves output for the offending chromosome.
///
pub fn call_peaks<R: BufRead, W: Write>(
    input: R,
    writer: &mut PeakWriter<W>,
    config: &PeakCallerConfig,
) -> Result<CallSummary, PeakCallerError> {
    let caller = PeakCaller::new(config.clone())?;
    let mut reader =
        ChromosomeReader::new(input).with_chromosome(config.restrict_chromosome.as_deref());

    writer.write_header()?;
    let mut summary = CallSummary::default();
    while let Some(block) = reader.next() {
        let block = block?;
        let called = caller.call_chromosome(&block);
        writer.write_peaks(&called.chrom, &called.peaks, reader.read_size())?;
        summary.add(&called);
    }
    writer.flush()?;

    warn_if_restriction_missed(config, &summary);
    Ok(summary)
}

///
/// Like [`call_peaks`], additionally writing the smoothed signal of every chunk's process
/// range to a pair of bedGraph tracks.
///
pub fn call_peaks_with_tracks<R: BufRead, W: Write, T: Write>(
    input: R,
    writer: &mut PeakWriter<W>,
    tracks: &mut BedGraphTracks<T>,
    config: &PeakCallerConfig,
) -> Result<CallSummary, PeakCallerError> {
    let caller = PeakCaller::new(config.clone())?;
    let mut reader =
        ChromosomeReader::new(input).with_chromosome(config.restrict_chromosome.as_deref());

    writer.write_header()?;
    let mut summary = CallSummary::default();
    while let Some(block) = reader.next() {
        let block = block?;
        let read_size = reader.read_size();

        let called = caller.call_chromosome_with(&block, |chunk, signals| {
            for strand in [Strand::Forward, Strand::Reverse] {
                let signal = signals.get(strand);
                tracks.write_signal(
                    &block.chrom,
                    strand,
                    &signal.values,
                    signal.shift,
                    chunk.process,
                    read_size,
                )?;
            }
            Ok::<(), std::io::Error>(())
        })?;
        writer.write_peaks(&called.chrom, &called.peaks, read_size)?;
        summary.add(&called);
    }
    writer.flush()?;
    tracks.flush()?;

    warn_if_restriction_missed(config, &summary);
    Ok(summary)
}

fn warn_if_restriction_missed(config: &PeakCallerConfig, summary: &CallSummary) {
    if let Some(chrom) = &config.restrict_chromosome {
        if summary.chromosomes == 0 {
            warn!("Chromosome {} not found in input", chrom);
        }
    }
}
