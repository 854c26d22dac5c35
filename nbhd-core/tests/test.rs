use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::*;

use nbhd_core::consts::TSS_COLUMN;
use nbhd_core::models::{ChromSizes, ChromosomeOrder, ColumnData, ParseOptions, RegionTable};

#[fixture]
fn path_to_candidates() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/candidates.bed")
}

#[fixture]
fn path_to_genes() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/genes.bed")
}

#[fixture]
fn path_to_chrom_sizes() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/test.chrom.sizes")
}

#[rstest]
fn test_parse_candidates(path_to_candidates: PathBuf) {
    let order = ChromosomeOrder::human();
    let mut table = RegionTable::parse(&path_to_candidates, &order, &ParseOptions::default()).unwrap();

    // the unplaced contig is dropped, the duplicate is kept until dedup
    assert_eq!(table.len(), 5);
    assert_eq!(
        table.field_names,
        vec!["name".to_string(), "score".to_string(), "strand".to_string()]
    );
    assert_eq!(table.path.as_deref(), Some(path_to_candidates.as_path()));

    assert_eq!(table.dedup(), 1);
    assert_eq!(table.len(), 4);
}

#[rstest]
fn test_gene_tss(path_to_genes: PathBuf) {
    let order = ChromosomeOrder::human();
    let mut genes = RegionTable::parse(&path_to_genes, &order, &ParseOptions::default()).unwrap();
    genes.derive_tss().unwrap();
    assert_eq!(
        genes.column(TSS_COLUMN),
        Some(&ColumnData::Integer(vec![1000, 8000, 100]))
    );
}

#[rstest]
fn test_chrom_sizes(path_to_chrom_sizes: PathBuf) {
    let sizes = ChromSizes::from_path(&path_to_chrom_sizes).unwrap();
    let canonical = sizes.restrict_to(&ChromosomeOrder::human());
    assert_eq!(canonical.names(), vec!["chr1", "chr2"]);
    assert_eq!(canonical.length("chr2"), Some(10000));
}
