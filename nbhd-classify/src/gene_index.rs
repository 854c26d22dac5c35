use nbhd_core::consts::{NAME_FIELD, TSS_COLUMN};
use nbhd_core::models::{GenomicInterval, Interval, RegionTable};
use nbhd_overlaprs::ChromIndex;

use crate::class::RegionClass;
use crate::errors::{ClassifyError, Result};

/// Default half-width of the promoter window around each TSS.
pub const DEFAULT_PROMOTER_HALF_WIDTH: u32 = 500;

///
/// Read-only promoter-window and gene-body indexes built from a gene table.
///
/// Promoter windows are `[tss - W, tss + W)` (clamped at 0) and labelled with the gene symbol;
/// gene bodies are the gene rows themselves.
///
#[derive(Debug, Clone)]
pub struct GeneIndex {
    promoters: ChromIndex<String>,
    bodies: ChromIndex<String>,
    half_width: u32,
}

fn window(tss: i64, half_width: u32) -> (u32, u32) {
    let tss = tss.clamp(0, u32::MAX as i64) as u32;
    (
        tss.saturating_sub(half_width),
        tss.saturating_add(half_width),
    )
}

impl GeneIndex {
    ///
    /// Build both indexes. `genes` must already carry the `tss` column (see
    /// [`RegionTable::derive_tss`]); symbols are taken from `symbol_field`.
    ///
    pub fn build(genes: &RegionTable, symbol_field: &str, half_width: u32) -> Result<Self> {
        let tss = genes.numeric_column(TSS_COLUMN)?;
        let symbol_idx = genes
            .field_index(symbol_field)
            .ok_or_else(|| ClassifyError::MissingSymbolField(symbol_field.to_string()))?;
        let symbol = |gene: &GenomicInterval| -> String {
            gene.fields.get(symbol_idx).cloned().unwrap_or_default()
        };

        let promoters = ChromIndex::build(genes.regions.iter().zip(&tss).map(|(gene, &tss)| {
            let (start, end) = window(tss as i64, half_width);
            (
                gene.chr.clone(),
                Interval {
                    start,
                    end,
                    val: symbol(gene),
                },
            )
        }));

        let bodies = ChromIndex::build(genes.regions.iter().map(|gene| {
            (
                gene.chr.clone(),
                Interval {
                    start: gene.start,
                    end: gene.query_end(),
                    val: symbol(gene),
                },
            )
        }));

        Ok(GeneIndex {
            promoters,
            bodies,
            half_width,
        })
    }

    /// Same as [`GeneIndex::build`] with symbols from the `name` field.
    pub fn from_genes(genes: &RegionTable, half_width: u32) -> Result<Self> {
        Self::build(genes, NAME_FIELD, half_width)
    }

    pub fn half_width(&self) -> u32 {
        self.half_width
    }

    ///
    /// Classify `[start, end)` on `chr`. Promoter beats genic beats intergenic. For promoters
    /// the symbols of every overlapping window are returned sorted and deduplicated; otherwise
    /// the list is empty.
    ///
    pub fn classify(&self, chr: &str, start: u32, end: u32) -> (RegionClass, Vec<String>) {
        let (start, end) = (start.min(end), start.max(end));
        let end = end.max(start.saturating_add(1));

        let mut symbols: Vec<String> = self
            .promoters
            .find_iter(chr, start, end)
            .map(|iv| iv.val.clone())
            .collect();
        if !symbols.is_empty() {
            symbols.sort();
            symbols.dedup();
            return (RegionClass::Promoter, symbols);
        }

        if self.bodies.overlaps_any(chr, start, end) {
            (RegionClass::Genic, vec![])
        } else {
            (RegionClass::Intergenic, vec![])
        }
    }
}

///
/// Promoter windows `[tss - W, tss + W)` for every gene, keeping the gene's extra fields, in
/// gene order. `genes` must carry the `tss` column.
///
pub fn promoter_windows(genes: &RegionTable, half_width: u32) -> Result<RegionTable> {
    let tss = genes.numeric_column(TSS_COLUMN)?;
    let regions = genes
        .regions
        .iter()
        .zip(&tss)
        .map(|(gene, &tss)| {
            let (start, end) = window(tss as i64, half_width);
            GenomicInterval::with_fields(gene.chr.clone(), start, end, gene.fields.clone())
        })
        .collect();
    Ok(RegionTable::new(regions, genes.field_names.clone()))
}
