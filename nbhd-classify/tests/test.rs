use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::*;

use nbhd_classify::{ClassSummary, GeneIndex, assign_classes};
use nbhd_core::models::{ChromosomeOrder, ColumnData, ParseOptions, RegionTable};

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

#[fixture]
fn index() -> GeneIndex {
    let mut genes =
        RegionTable::parse(data("genes.bed"), &ChromosomeOrder::human(), &ParseOptions::default())
            .unwrap();
    genes.derive_tss().unwrap();
    GeneIndex::from_genes(&genes, 500).unwrap()
}

#[fixture]
fn candidates() -> RegionTable {
    let mut table = RegionTable::parse(
        data("candidates.bed"),
        &ChromosomeOrder::human(),
        &ParseOptions::default(),
    )
    .unwrap();
    table.dedup();
    table
}

#[rstest]
fn test_assign_classes(index: GeneIndex, mut candidates: RegionTable) {
    let summary = assign_classes(&mut candidates, &index).unwrap();
    assert_eq!(
        summary,
        ClassSummary {
            total: 4,
            promoter: 2,
            genic: 1,
            intergenic: 1
        }
    );

    let names: Vec<&str> = (0..candidates.len())
        .map(|row| candidates.field(row, "name").unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "promoter|chr1:600-700",
            "genic|chr1:2000-2100",
            "intergenic|chr1:9000-9100",
            "promoter|chr2:150-150",
        ]
    );
    assert_eq!(
        candidates.column("enhancerSymbol"),
        Some(&ColumnData::Text(vec![
            "A".to_string(),
            String::new(),
            String::new(),
            "C".to_string()
        ]))
    );
}

#[rstest]
fn test_indicators_are_exclusive(index: GeneIndex, mut candidates: RegionTable) {
    assign_classes(&mut candidates, &index).unwrap();

    let flags: Vec<&Vec<bool>> = ["isPromoterElement", "isGenicElement", "isIntergenicElement"]
        .iter()
        .map(|name| match candidates.column(name) {
            Some(ColumnData::Bool(values)) => values,
            other => panic!("unexpected column {other:?}"),
        })
        .collect();

    for row in 0..candidates.len() {
        assert_eq!(flags.iter().filter(|f| f[row]).count(), 1);
    }
}
