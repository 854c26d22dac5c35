use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use nbhd_core::models::{ChromSizes, ColumnData, RegionKey, RegionTable};
use nbhd_coverage::{CoverageEngine, FeatureTrack};

use crate::cache::{cache_path, is_fresh, read_counts, write_counts};
use crate::config::QuantifierConfig;
use crate::errors::{QuantError, Result};
use crate::feature_map::{FeatureMap, replicate_key, summary_label};
use crate::rank::percentile_rank;

///
/// Raw counts of one track over one region table, plus the track's total signal. Produced
/// independently per (feature, track) and merged onto the table afterwards.
///
#[derive(Debug, Clone)]
pub struct CountArtifact {
    pub feature: String,
    pub track: FeatureTrack,
    pub path: PathBuf,
    pub rows: Vec<(RegionKey, f64)>,
    pub total: f64,
}

///
/// Counts features over a region table and derives the normalised columns.
///
pub struct FeatureQuantifier {
    engine: CoverageEngine,
    chrom_sizes: ChromSizes,
    config: QuantifierConfig,
}

impl FeatureQuantifier {
    /// A `config.timeout` replaces the engine's own per-call timeout.
    pub fn new(engine: CoverageEngine, chrom_sizes: ChromSizes, config: QuantifierConfig) -> Self {
        let engine = match config.timeout {
            Some(timeout) => engine.with_timeout(Some(timeout)),
            None => engine,
        };
        FeatureQuantifier {
            engine,
            chrom_sizes,
            config,
        }
    }

    pub fn config(&self) -> &QuantifierConfig {
        &self.config
    }

    ///
    /// Count `track` over `table`, or reuse a fresh count file, and look up the track total.
    ///
    pub fn produce_artifact(
        &self,
        table: &RegionTable,
        feature: &str,
        track: &FeatureTrack,
    ) -> Result<CountArtifact> {
        let path = cache_path(
            &self.config.outdir,
            &self.config.table_label,
            feature,
            &track.basename(),
        );

        let mut inputs: Vec<&Path> = vec![track.path()];
        if let Some(region_file) = table.path.as_deref() {
            inputs.push(region_file);
        }

        let rows = if !self.config.force && is_fresh(&path, &inputs) {
            info!("Loading coverage from pre-calculated file {}", path.display());
            read_counts(&path)?
        } else {
            info!("Regenerating {}", path.display());
            let keys: Vec<RegionKey> = table.keys().collect();
            let counts = self.engine.count(track, table, &self.chrom_sizes)?;
            write_counts(&path, &keys, &counts)?;
            keys.into_iter().zip(counts).collect()
        };

        let total = self.engine.total(track, &self.chrom_sizes)?;
        debug!("Total signal for {}: {}", track, total);

        Ok(CountArtifact {
            feature: feature.to_string(),
            track: track.clone(),
            path,
            rows,
            total,
        })
    }

    ///
    /// Join an artifact's counts onto `table` by `(chr, start, end)` and add the replicate's
    /// readCount, RPM, RPKM and quantile columns. Every row must find its count: a merge that
    /// would change the row count is an error.
    ///
    pub fn merge_artifact(&self, table: &mut RegionTable, artifact: &CountArtifact) -> Result<()> {
        let mut lookup: HashMap<&RegionKey, f64> = HashMap::with_capacity(artifact.rows.len());
        for (key, count) in &artifact.rows {
            lookup.entry(key).or_insert(*count);
        }

        let counts: Vec<f64> = table
            .keys()
            .filter_map(|key| lookup.get(&key).copied())
            .collect();
        if counts.len() != table.len() {
            return Err(QuantError::RowCountChanged {
                feature: artifact.feature.clone(),
                track: artifact.track.to_string(),
                expected: table.len(),
                found: counts.len(),
            });
        }

        let key = replicate_key(&artifact.feature, &artifact.track);
        self.add_normalized_columns(table, &key, counts, artifact.total)?;
        Ok(())
    }

    fn add_normalized_columns(
        &self,
        table: &mut RegionTable,
        key: &str,
        counts: Vec<f64>,
        total: f64,
    ) -> Result<()> {
        let rpm: Vec<f64> = counts.iter().map(|c| 1e6 * c / total).collect();

        if self.config.skip_rpkm_quantile {
            table.push_column(format!("{key}.readCount"), ColumnData::Float(counts))?;
            table.push_column(format!("{key}.RPM"), ColumnData::Float(rpm))?;
            return Ok(());
        }

        let rpkm: Vec<f64> = rpm
            .iter()
            .zip(&table.regions)
            .map(|(v, region)| 1e3 * v / region.effective_length() as f64)
            .collect();

        for (metric, values) in [("readCount", counts), ("RPM", rpm), ("RPKM", rpkm)] {
            let quantile = percentile_rank(&values);
            table.push_column(format!("{key}.{metric}"), ColumnData::Float(values))?;
            table.push_column(format!("{key}.{metric}.quantile"), ColumnData::Float(quantile))?;
        }
        Ok(())
    }

    ///
    /// Count one replicate track of `feature` onto `table`, then drop exact duplicate rows.
    ///
    pub fn count_one_track(
        &self,
        table: &mut RegionTable,
        feature: &str,
        track: &FeatureTrack,
    ) -> Result<()> {
        let artifact = self.produce_artifact(table, feature, track)?;
        self.merge_artifact(table, &artifact)?;
        let removed = table.dedup();
        if removed > 0 {
            debug!("Dropped {} duplicate rows after counting {}", removed, track);
        }
        Ok(())
    }

    ///
    /// Feature-level columns from the replicate columns: mean RPM and mean RPKM (each averaged
    /// on its own), with quantiles recomputed on the means.
    ///
    pub fn average_replicates(
        &self,
        table: &mut RegionTable,
        feature: &str,
        tracks: &[FeatureTrack],
    ) -> Result<()> {
        if tracks.is_empty() {
            return Err(QuantError::EmptyFeature(feature.to_string()));
        }
        let keys: Vec<String> = tracks.iter().map(|t| replicate_key(feature, t)).collect();
        let label = summary_label(feature);

        let mut metrics = vec!["RPM"];
        if !self.config.skip_rpkm_quantile {
            metrics.push("RPKM");
        }

        for metric in metrics {
            let columns = keys
                .iter()
                .map(|k| table.float_column(&format!("{k}.{metric}")))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let mean: Vec<f64> = (0..table.len())
                .map(|row| columns.iter().map(|c| c[row]).sum::<f64>() / columns.len() as f64)
                .collect();

            let quantile = percentile_rank(&mean);
            table.push_column(format!("{label}.{metric}"), ColumnData::Float(mean))?;
            if !self.config.skip_rpkm_quantile {
                table.push_column(
                    format!("{label}.{metric}.quantile"),
                    ColumnData::Float(quantile),
                )?;
            }
        }

        if !self.config.keep_replicate_counts {
            for key in &keys {
                table.remove_column(&format!("{key}.readCount"));
            }
        }
        Ok(())
    }

    ///
    /// Quantify every feature of `features` over `table`.
    ///
    /// All (feature, track) artifacts are produced on a pool of `threads` workers. They are then
    /// merged onto the table one at a time in feature-map order, each feature followed by its
    /// replicate averaging.
    ///
    pub fn count_feature_map(&self, table: &mut RegionTable, features: &FeatureMap) -> Result<()> {
        let removed = table.dedup();
        if removed > 0 {
            info!("Dropped {} duplicate regions before counting", removed);
        }
        let expected = table.len();

        let jobs: Vec<(&str, &FeatureTrack)> = features
            .iter()
            .flat_map(|entry| entry.tracks.iter().map(move |t| (entry.label.as_str(), t)))
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.max(1))
            .build()?;

        let bar = ProgressBar::new(jobs.len() as u64);
        if let Ok(style) =
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.set_message("counting tracks");

        let snapshot: &RegionTable = table;
        let artifacts: Vec<Result<CountArtifact>> = pool.install(|| {
            jobs.par_iter()
                .map(|(feature, track)| {
                    let artifact = self.produce_artifact(snapshot, feature, track);
                    bar.inc(1);
                    artifact
                })
                .collect()
        });
        bar.finish_and_clear();

        let mut artifacts = artifacts.into_iter();
        for entry in features {
            for _ in &entry.tracks {
                let Some(artifact) = artifacts.next() else {
                    break;
                };
                self.merge_artifact(table, &artifact?)?;
                table.dedup();
            }
            self.average_replicates(table, &entry.label, &entry.tracks)?;

            if table.len() != expected {
                return Err(QuantError::RowCountChanged {
                    feature: entry.label.clone(),
                    track: entry
                        .tracks
                        .iter()
                        .map(|t| t.to_string())
                        .collect::<Vec<_>>()
                        .join(","),
                    expected,
                    found: table.len(),
                });
            }
        }
        Ok(())
    }
}
