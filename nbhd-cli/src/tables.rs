use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use log::info;

use nbhd_core::models::{ChromosomeOrder, ParseOptions, RegionTable};

/// Value of a required string argument.
pub fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(id)
        .ok_or_else(|| anyhow!("Missing required argument --{}", id))
}

/// Parse an interval file fully sorted by `(chr, start, end)`.
pub fn read_sorted(path: &str, order: &ChromosomeOrder) -> Result<RegionTable> {
    let options = ParseOptions {
        sort: true,
        ..Default::default()
    };
    let table = RegionTable::parse(path, order, &options)
        .with_context(|| format!("Failed to read interval file {}", path))?;
    info!("Read {} regions from {}", table.len(), path);
    Ok(table)
}

/// `--output` if given, otherwise `{outdir}/{default_name}`.
pub fn output_path(matches: &ArgMatches, outdir: &Path, default_name: &str) -> PathBuf {
    matches
        .try_get_one::<String>("output")
        .ok()
        .flatten()
        .map(PathBuf::from)
        .unwrap_or_else(|| outdir.join(default_name))
}

pub fn write_table(table: &RegionTable, path: &Path) -> Result<()> {
    table
        .write_tsv(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
