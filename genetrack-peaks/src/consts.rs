pub const DEFAULT_SIGMA: u32 = 5;
pub const DEFAULT_MIN_SEPARATION: u32 = 20;
pub const DEFAULT_HEIGHT_FILTER: f64 = 3.0;
pub const DEFAULT_KERNEL_WIDTH_MULTIPLIER: u32 = 4;

pub const BASES_PER_MB: u64 = 1_000_000;
pub const DEFAULT_CHUNK_SIZE_MB: u64 = 10;
pub const DEFAULT_CHUNK_SIZE: u64 = DEFAULT_CHUNK_SIZE_MB * BASES_PER_MB;

pub const DEFAULT_THREADS: usize = 1;
