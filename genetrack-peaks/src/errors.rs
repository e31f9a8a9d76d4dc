use thiserror::Error;

use genetrack_core::InvalidFileError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("sigma must be greater than zero")]
    ZeroSigma,

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("kernel width multiplier must be greater than zero")]
    ZeroKernelWidth,

    #[error("height filter must be a finite number, got {0}")]
    InvalidHeightFilter(f64),

    #[error("Can't parse override table: {0}")]
    OverrideParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum PeakCallerError {
    #[error(transparent)]
    InvalidFile(#[from] InvalidFileError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
