use std::path::Path;

use anyhow::{Result, bail};
use clap::ArgMatches;

use nbhd_core::utils::remove_all_extensions;

use crate::settings::RunSettings;
use crate::tables::{output_path, read_sorted, required, write_table};

pub fn run_quantify(matches: &ArgMatches) -> Result<()> {
    let settings = RunSettings::from_matches(matches)?;
    let regions = required(matches, "regions")?;
    if settings.features.is_empty() {
        bail!("No features to count: pass --feature or list [[features]] in the run file");
    }

    let chrom_sizes = settings.load_chrom_sizes()?;
    let mut table = read_sorted(regions, &settings.order)?;

    let label = remove_all_extensions(Path::new(regions));
    let quantifier = settings.quantifier(&label, chrom_sizes);
    quantifier.count_feature_map(&mut table, &settings.features)?;

    let output = output_path(matches, &settings.outdir, &format!("{label}.Features.tsv"));
    write_table(&table, &output)
}
