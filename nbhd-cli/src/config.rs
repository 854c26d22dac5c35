use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ACCESSIBILITY_FEATURE: &str = "DHS";
pub const DEFAULT_EXCLUDE_CHROM_PATTERN: &str = "random|chrM|_|hap|Un";

fn default_half_width() -> u32 {
    nbhd_classify::DEFAULT_PROMOTER_HALF_WIDTH
}

fn default_accessibility() -> String {
    DEFAULT_ACCESSIBILITY_FEATURE.to_string()
}

fn default_exclude() -> String {
    DEFAULT_EXCLUDE_CHROM_PATTERN.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    pub name: String,
    pub tracks: Vec<String>,
}

///
/// A TOML run file. Only `chromosomes` is required; command-line flags override the rest.
///
/// ```toml
/// chromosomes = ["chr1", "chr2", "chrX"]
/// chrom_sizes = "hg38.chrom.sizes"
/// threads = 4
///
/// [[features]]
/// name = "H3K27ac"
/// tracks = ["k27.rep1.bam", "k27.rep2.bam"]
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub chromosomes: Vec<String>,
    pub chrom_sizes: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub threads: Option<usize>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub skip_rpkm_quantile: bool,
    #[serde(default)]
    pub keep_replicate_counts: bool,
    #[serde(default = "default_half_width")]
    pub promoter_half_width: u32,
    #[serde(default = "default_accessibility")]
    pub default_accessibility_feature: String,
    #[serde(default = "default_exclude")]
    pub exclude_chrom_pattern: String,
    #[serde(default)]
    pub features: Vec<FeatureConfig>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Run file lists no chromosomes")]
    NoChromosomes,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl RunConfig {
    /// Defaults for everything but the chromosome list.
    pub fn with_chromosomes(chromosomes: Vec<String>) -> Self {
        RunConfig {
            chromosomes,
            chrom_sizes: None,
            outdir: None,
            threads: None,
            timeout_secs: None,
            force: false,
            skip_rpkm_quantile: false,
            keep_replicate_counts: false,
            promoter_half_width: default_half_width(),
            default_accessibility_feature: default_accessibility(),
            exclude_chrom_pattern: default_exclude(),
            features: vec![],
        }
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        let config: RunConfig = toml::from_str(contents)?;
        if config.chromosomes.is_empty() {
            return Err(ConfigError::NoChromosomes);
        }
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }
}
