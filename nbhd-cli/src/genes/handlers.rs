use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use log::{info, warn};

use nbhd_classify::promoter_windows;
use nbhd_core::consts::NAME_FIELD;
use nbhd_quant::promoter_activity_quantile;

use crate::settings::RunSettings;
use crate::tables::{read_sorted, required, write_table};

pub const GENE_TABLE: &str = "GeneList.txt";
pub const TSS_TABLE: &str = "GeneList.TSS1kb.txt";
pub const GENE_LABEL: &str = "Genes";
pub const TSS_LABEL: &str = "Genes.TSS1kb";
pub const TSS_SUFFIX: &str = ".TSS1Kb";
pub const ACTIVE_MARK: &str = "H3K27ac";

pub fn run_genes(matches: &ArgMatches) -> Result<()> {
    let settings = RunSettings::from_matches(matches)?;
    let genes_path = required(matches, "genes")?;
    if settings.features.is_empty() {
        bail!("No features to count: pass --feature or list [[features]] in the run file");
    }
    let chrom_sizes = settings.load_chrom_sizes()?;

    let mut genes = read_sorted(genes_path, &settings.order)?;
    genes
        .derive_tss()
        .with_context(|| format!("Gene file {} has no strand column", genes_path))?;

    let mut windows = promoter_windows(&genes, settings.half_width)?;
    windows.path = genes.path.clone();

    settings
        .quantifier(GENE_LABEL, chrom_sizes.clone())
        .count_feature_map(&mut genes, &settings.features)?;
    settings
        .quantifier(TSS_LABEL, chrom_sizes)
        .count_feature_map(&mut windows, &settings.features)?;
    write_table(&windows, &settings.outdir.join(TSS_TABLE))?;

    genes
        .join_by_field(&windows, NAME_FIELD, TSS_SUFFIX)
        .context("Failed to join TSS window counts onto genes")?;

    if promoter_activity_quantile(&mut genes, ACTIVE_MARK, &settings.accessibility, TSS_SUFFIX)? {
        info!("Computed promoter activity from {} and {}", ACTIVE_MARK, settings.accessibility);
    } else {
        warn!(
            "Skipping promoter activity: needs features {} and {}",
            ACTIVE_MARK, settings.accessibility
        );
    }

    write_table(&genes, &settings.outdir.join(GENE_TABLE))
}
