use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use nbhd_classify::{ClassSummary, GeneIndex, assign_classes};
use nbhd_core::models::RegionTable;
use nbhd_core::utils::remove_all_extensions;

use crate::settings::RunSettings;
use crate::tables::{output_path, read_sorted, required, write_table};

/// Read genes, derive their TSS and classify `table` against them.
pub fn classify_table(
    table: &mut RegionTable,
    genes_path: &str,
    settings: &RunSettings,
) -> Result<ClassSummary> {
    let mut genes = read_sorted(genes_path, &settings.order)?;
    genes
        .derive_tss()
        .with_context(|| format!("Gene file {} has no strand column", genes_path))?;
    let index = GeneIndex::from_genes(&genes, settings.half_width)?;
    Ok(assign_classes(table, &index)?)
}

pub fn run_classify(matches: &ArgMatches) -> Result<()> {
    let settings = RunSettings::from_matches(matches)?;
    let regions = required(matches, "regions")?;
    let genes = required(matches, "genes")?;

    let mut table = read_sorted(regions, &settings.order)?;
    classify_table(&mut table, genes, &settings)?;

    let label = remove_all_extensions(Path::new(regions));
    let output = output_path(matches, &settings.outdir, &format!("{label}.Classified.tsv"));
    write_table(&table, &output)
}
