//! Peak calling parameters.
//!
//! Everything the engine needs is carried in a [`PeakCallerConfig`] value that is passed
//! down explicitly; nothing is derived from process-wide state. Per-file adjustments of
//! `sigma` and `min_separation` come from a TOML [`FileOverrides`] table:
//!
//! ```toml
//! [files."sample1.idx"]
//! sigma = 10
//! min_separation = 40
//!
//! [files.sample2]
//! sigma = 3
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use genetrack_core::utils::remove_all_extensions;

use crate::consts::{
    DEFAULT_CHUNK_SIZE, DEFAULT_HEIGHT_FILTER, DEFAULT_KERNEL_WIDTH_MULTIPLIER,
    DEFAULT_MIN_SEPARATION, DEFAULT_SIGMA,
};
use crate::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PeakCallerConfig {
    /// Spread of the smoothing kernel.
    pub sigma: u32,
    /// Diameter of the exclusion zone around a kept peak.
    pub min_separation: u32,
    /// Upstream peak width; half of `min_separation` when unset.
    pub up_width: Option<u32>,
    /// Downstream peak width; half of `min_separation` when unset.
    pub down_width: Option<u32>,
    /// Peaks with a height at or below this are dropped.
    pub height_filter: f64,
    /// Largest coordinate span processed at once, in bases.
    pub chunk_size: u64,
    /// Only call this chromosome.
    pub restrict_chromosome: Option<String>,
    /// Kernel half-width in units of sigma.
    pub kernel_width_multiplier: u32,
}

impl Default for PeakCallerConfig {
    fn default() -> Self {
        PeakCallerConfig {
            sigma: DEFAULT_SIGMA,
            min_separation: DEFAULT_MIN_SEPARATION,
            up_width: None,
            down_width: None,
            height_filter: DEFAULT_HEIGHT_FILTER,
            chunk_size: DEFAULT_CHUNK_SIZE,
            restrict_chromosome: None,
            kernel_width_multiplier: DEFAULT_KERNEL_WIDTH_MULTIPLIER,
        }
    }
}

impl PeakCallerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sigma == 0 {
            return Err(ConfigError::ZeroSigma);
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.kernel_width_multiplier == 0 {
            return Err(ConfigError::ZeroKernelWidth);
        }
        if !self.height_filter.is_finite() {
            return Err(ConfigError::InvalidHeightFilter(self.height_filter));
        }
        Ok(())
    }

    /// Half-width `W` of the smoothing kernel, which is also the chunk overlap.
    pub fn kernel_half_width(&self) -> i64 {
        self.sigma as i64 * self.kernel_width_multiplier as i64
    }

    /// Radius of the exclusion zone: half of `min_separation`.
    pub fn exclusion_radius(&self) -> i64 {
        (self.min_separation / 2) as i64
    }

    pub fn upstream_width(&self) -> i64 {
        self.up_width.unwrap_or(self.min_separation / 2) as i64
    }

    pub fn downstream_width(&self) -> i64 {
        self.down_width.unwrap_or(self.min_separation / 2) as i64
    }

    /// A copy of this config with any overridden parameters replaced.
    pub fn with_overrides(&self, overrides: &ParameterOverride) -> Self {
        PeakCallerConfig {
            sigma: overrides.sigma.unwrap_or(self.sigma),
            min_separation: overrides.min_separation.unwrap_or(self.min_separation),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParameterOverride {
    pub sigma: Option<u32>,
    pub min_separation: Option<u32>,
}

/// Per-file parameter overrides, keyed by file name or by file name without extensions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileOverrides {
    #[serde(default)]
    pub files: HashMap<String, ParameterOverride>,
}

impl FileOverrides {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    ///
    /// Find the overrides for an input file: an exact file-name entry wins over a
    /// stem entry.
    ///
    pub fn lookup(&self, path: &Path) -> Option<&ParameterOverride> {
        let file_name = path.file_name()?.to_string_lossy();
        self.files
            .get(file_name.as_ref())
            .or_else(|| self.files.get(&remove_all_extensions(path)))
    }

    /// The config to use for `path`.
    pub fn config_for(&self, path: &Path, base: &PeakCallerConfig) -> PeakCallerConfig {
        match self.lookup(path) {
            Some(overrides) => base.with_overrides(overrides),
            None => base.clone(),
        }
    }
}
