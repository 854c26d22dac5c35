use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, arg, value_parser};

use nbhd_core::models::{ChromSizes, ChromosomeOrder};
use nbhd_coverage::{CoverageEngine, FeatureTrack};
use nbhd_quant::{FeatureEntry, FeatureMap, FeatureQuantifier, QuantifierConfig};

use crate::config::RunConfig;

/// `--config` and `--chromosomes`: every subcommand needs a chromosome order.
pub fn chromosome_args() -> Vec<Arg> {
    vec![
        arg!(--config <config> "TOML run file"),
        arg!(--chromosomes <chromosomes> "Comma-separated canonical chromosomes, in sort order"),
    ]
}

/// Flags for subcommands that count features.
pub fn quant_args() -> Vec<Arg> {
    vec![
        arg!(--"chrom-sizes" <chrom_sizes> "Chromosome sizes file (chr<TAB>length)"),
        arg!(--outdir <outdir> "Directory for count files and results"),
        arg!(--threads <threads> "Worker threads for counting").value_parser(value_parser!(usize)),
        arg!(--timeout <timeout> "Seconds allowed per backend call")
            .value_parser(value_parser!(u64)),
        arg!(--feature <feature> "Feature and its replicate tracks: LABEL=track[,track...]")
            .action(ArgAction::Append),
        arg!(--force "Recount even when count files exist").action(ArgAction::SetTrue),
        arg!(--"skip-rpkm-quantile" "Only compute RPM").action(ArgAction::SetTrue),
        arg!(--"keep-replicate-counts" "Keep per-replicate readCount columns")
            .action(ArgAction::SetTrue),
    ]
}

fn opt<'a, T: Clone + Send + Sync + 'static>(matches: &'a ArgMatches, id: &str) -> Option<&'a T> {
    matches.try_get_one::<T>(id).ok().flatten()
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    opt::<bool>(matches, id).copied().unwrap_or(false)
}

///
/// Run file values with command-line overrides applied.
///
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub order: ChromosomeOrder,
    pub chrom_sizes: Option<PathBuf>,
    pub outdir: PathBuf,
    pub threads: usize,
    pub timeout: Option<Duration>,
    pub force: bool,
    pub skip_rpkm_quantile: bool,
    pub keep_replicate_counts: bool,
    pub half_width: u32,
    pub accessibility: String,
    pub exclude_pattern: String,
    pub features: FeatureMap,
}

impl RunSettings {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let chromosomes = opt::<String>(matches, "chromosomes").map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        });

        let mut config = match opt::<String>(matches, "config") {
            Some(path) => RunConfig::from_path(path)
                .with_context(|| format!("Failed to read run file {}", path))?,
            None => match &chromosomes {
                Some(list) => RunConfig::with_chromosomes(list.clone()),
                None => bail!("A chromosome order is required: pass --config or --chromosomes"),
            },
        };
        if let Some(list) = chromosomes {
            config.chromosomes = list;
        }
        if config.chromosomes.is_empty() {
            bail!("The chromosome order is empty");
        }

        let mut features = FeatureMap::new();
        for feature in &config.features {
            let tracks = feature
                .tracks
                .iter()
                .map(FeatureTrack::new)
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Bad track for feature {}", feature.name))?;
            features.insert(feature.name.clone(), tracks)?;
        }
        if let Ok(Some(specs)) = matches.try_get_many::<String>("feature") {
            for spec in specs {
                let entry: FeatureEntry = spec.parse()?;
                features.insert(entry.label, entry.tracks)?;
            }
        }

        Ok(RunSettings {
            order: ChromosomeOrder::new(config.chromosomes),
            chrom_sizes: opt::<String>(matches, "chrom-sizes")
                .map(PathBuf::from)
                .or(config.chrom_sizes),
            outdir: opt::<String>(matches, "outdir")
                .map(PathBuf::from)
                .or(config.outdir)
                .unwrap_or_else(|| PathBuf::from(".")),
            threads: opt::<usize>(matches, "threads")
                .copied()
                .or(config.threads)
                .unwrap_or(1),
            timeout: opt::<u64>(matches, "timeout")
                .copied()
                .or(config.timeout_secs)
                .map(Duration::from_secs),
            force: flag(matches, "force") || config.force,
            skip_rpkm_quantile: flag(matches, "skip-rpkm-quantile") || config.skip_rpkm_quantile,
            keep_replicate_counts: flag(matches, "keep-replicate-counts")
                || config.keep_replicate_counts,
            half_width: opt::<u32>(matches, "half-width")
                .copied()
                .unwrap_or(config.promoter_half_width),
            accessibility: config.default_accessibility_feature,
            exclude_pattern: opt::<String>(matches, "exclude")
                .cloned()
                .unwrap_or(config.exclude_chrom_pattern),
            features,
        })
    }

    pub fn load_chrom_sizes(&self) -> Result<ChromSizes> {
        let Some(path) = &self.chrom_sizes else {
            bail!("A chromosome sizes file is required: pass --chrom-sizes or set chrom_sizes");
        };
        ChromSizes::from_path(path)
            .with_context(|| format!("Failed to read chromosome sizes {}", path.display()))
    }

    pub fn quantifier(&self, table_label: &str, chrom_sizes: ChromSizes) -> FeatureQuantifier {
        let engine = CoverageEngine::native(self.order.clone());
        let config = QuantifierConfig {
            outdir: self.outdir.clone(),
            table_label: table_label.to_string(),
            skip_rpkm_quantile: self.skip_rpkm_quantile,
            force: self.force,
            threads: self.threads,
            timeout: self.timeout,
            keep_replicate_counts: self.keep_replicate_counts,
        };
        FeatureQuantifier::new(engine, chrom_sizes, config)
    }
}
