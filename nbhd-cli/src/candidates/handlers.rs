use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;
use regex::Regex;

use nbhd_core::models::RegionTable;

use crate::classify::handlers::classify_table;
use crate::settings::RunSettings;
use crate::tables::{read_sorted, required, write_table};

pub const ENHANCER_TABLE: &str = "EnhancerList.txt";
pub const ENHANCER_BED: &str = "EnhancerList.bed";
pub const TABLE_LABEL: &str = "Enhancers";

/// Drop rows whose chromosome matches `pattern`; returns how many were dropped.
pub fn exclude_chromosomes(table: &mut RegionTable, pattern: &str) -> Result<usize> {
    let re = Regex::new(pattern)
        .with_context(|| format!("Invalid chromosome exclusion pattern {:?}", pattern))?;
    let before = table.len();
    table.retain_rows(|region| !re.is_match(&region.chr));
    Ok(before - table.len())
}

pub fn run_candidates(matches: &ArgMatches) -> Result<()> {
    let settings = RunSettings::from_matches(matches)?;
    let regions = required(matches, "regions")?;
    let genes = required(matches, "genes")?;

    let mut table = read_sorted(regions, &settings.order)?;
    let excluded = exclude_chromosomes(&mut table, &settings.exclude_pattern)?;
    if excluded > 0 {
        info!("Excluded {} candidates on filtered chromosomes", excluded);
    }
    table.dedup();

    if settings.features.is_empty() {
        info!("No features configured; skipping quantification");
    } else {
        let chrom_sizes = settings.load_chrom_sizes()?;
        let quantifier = settings.quantifier(TABLE_LABEL, chrom_sizes);
        quantifier.count_feature_map(&mut table, &settings.features)?;
    }

    classify_table(&mut table, genes, &settings)?;

    write_table(&table, &settings.outdir.join(ENHANCER_TABLE))?;
    let bed = settings.outdir.join(ENHANCER_BED);
    table
        .write_bed(&bed)
        .with_context(|| format!("Failed to write {}", bed.display()))?;
    Ok(())
}
