use std::path::PathBuf;
use std::time::Duration;

/// Knobs for a [`FeatureQuantifier`](crate::FeatureQuantifier) run.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantifierConfig {
    /// Directory receiving the per-track count files.
    pub outdir: PathBuf,
    /// Prefix of the count file names, usually the region file's base name.
    pub table_label: String,
    /// Only derive RPM; skip RPKM and all quantile columns.
    pub skip_rpkm_quantile: bool,
    /// Recount even when a fresh count file exists.
    pub force: bool,
    pub threads: usize,
    /// Per backend call; overrides the engine's timeout when set.
    pub timeout: Option<Duration>,
    /// Keep the per-replicate `readCount` columns after averaging.
    pub keep_replicate_counts: bool,
}

impl Default for QuantifierConfig {
    fn default() -> Self {
        QuantifierConfig {
            outdir: PathBuf::from("."),
            table_label: "regions".to_string(),
            skip_rpkm_quantile: false,
            force: false,
            threads: 1,
            timeout: None,
            keep_replicate_counts: false,
        }
    }
}
