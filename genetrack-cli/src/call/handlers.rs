use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use genetrack_core::utils::remove_all_extensions;
use genetrack_io::OutputFormat;
use genetrack_peaks::consts::{BASES_PER_MB, DEFAULT_CHUNK_SIZE_MB};
use genetrack_peaks::{
    CallSummary, FileOverrides, PeakCallerConfig, RunOptions, collect_inputs, get_output_path,
    process_file, process_file_to_path,
};

/// Build the base peak calling config from the command line.
pub fn config_from_matches(matches: &ArgMatches) -> Result<PeakCallerConfig> {
    let defaults = PeakCallerConfig::default();

    // a width of 0 on the command line means "not set"
    let width = |name: &str| matches.get_one::<u32>(name).copied().filter(|w| *w > 0);

    let chunk_mb = matches
        .get_one::<u64>("chunk-size")
        .copied()
        .unwrap_or(DEFAULT_CHUNK_SIZE_MB);

    let config = PeakCallerConfig {
        sigma: matches.get_one::<u32>("sigma").copied().unwrap_or(defaults.sigma),
        min_separation: matches
            .get_one::<u32>("exclusion")
            .copied()
            .unwrap_or(defaults.min_separation),
        up_width: width("up-width"),
        down_width: width("down-width"),
        height_filter: matches
            .get_one::<f64>("filter")
            .copied()
            .unwrap_or(defaults.height_filter),
        chunk_size: chunk_mb.saturating_mul(BASES_PER_MB),
        restrict_chromosome: matches.get_one::<String>("chromosome").cloned(),
        ..defaults
    };
    config.validate()?;
    Ok(config)
}

pub fn run_call(matches: &ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;

    let overrides = match matches.get_one::<String>("overrides") {
        Some(path) => FileOverrides::from_file(path)
            .with_context(|| format!("Failed to load overrides from {}", path))?,
        None => FileOverrides::default(),
    };

    let format = match matches.get_one::<String>("format") {
        Some(format) => OutputFormat::from_str(format).map_err(anyhow::Error::msg)?,
        None => OutputFormat::GFF,
    };
    let threads = matches.get_one::<usize>("threads").copied().unwrap_or(1);
    let bedgraph_dir = matches.get_one::<String>("bedgraph").map(PathBuf::from);
    let output = matches.get_one::<String>("output");
    let output_dir = matches.get_one::<String>("output-dir").map(PathBuf::from);

    let inputs: Vec<PathBuf> = matches
        .get_many::<String>("inputs")
        .unwrap_or_default()
        .map(PathBuf::from)
        .collect();

    let options = RunOptions {
        format,
        threads,
        bedgraph_dir: bedgraph_dir.clone(),
    };

    //
    // STDIN
    //
    if inputs.len() == 1 && inputs[0] == Path::new("-") {
        let summary = match output.map(String::as_str) {
            None | Some("-") => {
                let stdout = io::stdout();
                process_file("-", BufWriter::new(stdout.lock()), &config, &options)?
            }
            Some(path) => process_file_to_path(Path::new("-"), Path::new(path), &config, &options)?,
        };
        report("stdin", &summary);
        return Ok(());
    }

    //
    // FILES
    //
    let files = collect_inputs(&inputs)?;
    if files.is_empty() {
        anyhow::bail!("No input files found");
    }
    if output.is_some() && files.len() > 1 {
        anyhow::bail!("--output can only be used with a single input file; use --output-dir");
    }
    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    for file in &files {
        let file_config = overrides.config_for(file, &config);
        file_config.validate()?;

        let mut file_options = options.clone();
        if files.len() > 1 {
            // one track pair per input
            file_options.bedgraph_dir = bedgraph_dir
                .as_ref()
                .map(|dir| dir.join(remove_all_extensions(file)));
        }

        let summary = match output.map(String::as_str) {
            Some("-") => {
                let stdout = io::stdout();
                process_file(
                    &file.to_string_lossy(),
                    BufWriter::new(stdout.lock()),
                    &file_config,
                    &file_options,
                )?
            }
            Some(path) => {
                process_file_to_path(file, Path::new(path), &file_config, &file_options)?
            }
            None => {
                let out = get_output_path(file, output_dir.as_deref(), &file_config, format);
                process_file_to_path(file, &out, &file_config, &file_options)?
            }
        };
        report(&file.to_string_lossy(), &summary);
    }

    Ok(())
}

fn report(input: &str, summary: &CallSummary) {
    info!(
        "Finished {}: {} peak(s), {} chromosome(s), {} chunk(s)",
        input, summary.peaks, summary.chromosomes, summary.chunks
    );
}
