use std::fmt::{self, Display};

use log::info;
use rayon::prelude::*;

use nbhd_core::consts::NAME_FIELD;
use nbhd_core::models::{ColumnData, RegionTable};

use crate::class::RegionClass;
use crate::errors::{ClassifyError, Result};
use crate::gene_index::GeneIndex;

pub const CLASS_COLUMN: &str = "class";
pub const SYMBOL_COLUMN: &str = "enhancerSymbol";
pub const IS_PROMOTER_COLUMN: &str = "isPromoterElement";
pub const IS_GENIC_COLUMN: &str = "isGenicElement";
pub const IS_INTERGENIC_COLUMN: &str = "isIntergenicElement";

/// Per-class region counts of one classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassSummary {
    pub total: usize,
    pub promoter: usize,
    pub genic: usize,
    pub intergenic: usize,
}

impl ClassSummary {
    fn add(&mut self, class: RegionClass) {
        self.total += 1;
        match class {
            RegionClass::Promoter => self.promoter += 1,
            RegionClass::Genic => self.genic += 1,
            RegionClass::Intergenic => self.intergenic += 1,
        }
    }
}

impl Display for ClassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total enhancers: {}, promoters: {}, genic: {}, intergenic: {}",
            self.total, self.promoter, self.genic, self.intergenic
        )
    }
}

///
/// Classify every region of `table` and annotate it in place:
///
/// - `name` becomes `{class}|{chr}:{start}-{end}`
/// - `class`, `enhancerSymbol` (comma-joined promoter symbols, empty otherwise)
/// - `isPromoterElement`, `isGenicElement`, `isIntergenicElement`
///
pub fn assign_classes(table: &mut RegionTable, index: &GeneIndex) -> Result<ClassSummary> {
    let labelled: Vec<(RegionClass, String)> = table
        .regions
        .par_iter()
        .map(|region| {
            let (class, symbols) = index.classify(&region.chr, region.start, region.end);
            (class, symbols.join(","))
        })
        .collect();

    let mut summary = ClassSummary::default();
    let mut names = Vec::with_capacity(labelled.len());
    for ((class, symbol), region) in labelled.iter().zip(&table.regions) {
        if symbol == "\n" {
            return Err(ClassifyError::MalformedSymbol {
                region: region.coords(),
            });
        }
        summary.add(*class);
        names.push(format!("{}|{}", class, region.coords()));
    }

    let flag = |wanted: RegionClass| {
        ColumnData::Bool(labelled.iter().map(|(class, _)| *class == wanted).collect())
    };
    let classes = ColumnData::Text(labelled.iter().map(|(c, _)| c.to_string()).collect());
    let symbols = ColumnData::Text(labelled.iter().map(|(_, s)| s.clone()).collect());

    table.set_field(NAME_FIELD, names)?;
    table.push_column(CLASS_COLUMN, classes)?;
    table.push_column(IS_PROMOTER_COLUMN, flag(RegionClass::Promoter))?;
    table.push_column(IS_GENIC_COLUMN, flag(RegionClass::Genic))?;
    table.push_column(IS_INTERGENIC_COLUMN, flag(RegionClass::Intergenic))?;
    table.push_column(SYMBOL_COLUMN, symbols)?;

    info!("{}", summary);
    Ok(summary)
}
