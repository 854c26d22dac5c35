use nbhd_core::models::{ColumnData, RegionTable};

use crate::errors::Result;
use crate::rank::percentile_rank;

pub const PROMOTER_ACTIVITY_COLUMN: &str = "PromoterActivityQuantile";

/// Added to each quantile before multiplying, so a zero in one mark doesn't erase the other.
const QUANTILE_PSEUDOCOUNT: f64 = 0.0001;

///
/// `PromoterActivityQuantile = rank((ε + H3K27ac quantile) × (ε + accessibility quantile))`,
/// from the two `*.RPKM.quantile{suffix}` columns of a gene table. Returns `false` without
/// touching the table when either column is missing.
///
pub fn promoter_activity_quantile(
    genes: &mut RegionTable,
    active_mark: &str,
    accessibility: &str,
    suffix: &str,
) -> Result<bool> {
    let mark_column = format!("{active_mark}.RPKM.quantile{suffix}");
    let access_column = format!("{accessibility}.RPKM.quantile{suffix}");
    if !genes.has_column(&mark_column) || !genes.has_column(&access_column) {
        return Ok(false);
    }

    let mark = genes.numeric_column(&mark_column)?;
    let access = genes.numeric_column(&access_column)?;
    let product: Vec<f64> = mark
        .iter()
        .zip(&access)
        .map(|(m, a)| (QUANTILE_PSEUDOCOUNT + m) * (QUANTILE_PSEUDOCOUNT + a))
        .collect();

    genes.push_column(
        PROMOTER_ACTIVITY_COLUMN,
        ColumnData::Float(percentile_rank(&product)),
    )?;
    Ok(true)
}
