use clap::{Arg, Command, arg, value_parser};

pub const CALL_CMD: &str = "call";

pub fn create_call_cli() -> Command {
    Command::new(CALL_CMD)
        .author("Databio")
        .about("Call peaks on one or more chromosome-grouped read files (idx, bed or gff, optionally gzipped).")
        .arg_required_else_help(true)
        .arg(
            Arg::new("inputs")
                .help("Input files or directories, or - for stdin")
                .num_args(1..)
                .required(true),
        )
        .arg(
            arg!(-s --sigma <sigma> "Sigma of the smoothing kernel")
                .value_parser(value_parser!(u32))
                .default_value("5"),
        )
        .arg(
            arg!(-e --exclusion <exclusion> "Exclusion zone width around each peak")
                .value_parser(value_parser!(u32))
                .default_value("20"),
        )
        .arg(
            arg!(-u --"up-width" <width> "Upstream width of called peaks (default: half the exclusion zone)")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(-d --"down-width" <width> "Downstream width of called peaks (default: half the exclusion zone)")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(-F --filter <height> "Drop peaks with a height at or below this value")
                .value_parser(value_parser!(f64))
                .default_value("3.0"),
        )
        .arg(arg!(-c --chromosome <chromosome> "Only call peaks on this chromosome"))
        .arg(
            arg!(-k --"chunk-size" <mb> "Chunk size in millions of bases")
                .value_parser(value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(-o --format <format> "Output format")
                .value_parser(["gff", "txt"])
                .default_value("gff"),
        )
        .arg(arg!(-b --bedgraph <dir> "Also write forward/reverse bedGraph signal tracks into this directory"))
        .arg(
            arg!(-t --threads <threads> "Number of chromosomes called in parallel")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
        .arg(arg!(--overrides <toml> "TOML table of per-file sigma / exclusion overrides"))
        .arg(arg!(--output <output> "Output file for a single input (- for stdout)"))
        .arg(arg!(--"output-dir" <dir> "Directory for batch output files"))
}
