//! Genome-wide interval indexing: one [`Bits`] index per chromosome.
//!
//! ```
//! use nbhd_overlaprs::{ChromIndex, Interval};
//!
//! let genes = ChromIndex::build(vec![
//!     ("chr1".to_string(), Interval { start: 1000u32, end: 5000, val: "A".to_string() }),
//!     ("chr2".to_string(), Interval { start: 100, end: 400, val: "C".to_string() }),
//! ]);
//!
//! assert!(genes.overlaps_any("chr1", 2000, 2100));
//! assert!(!genes.overlaps_any("chr2", 2000, 2100));
//! assert!(!genes.overlaps_any("chrX", 0, 10));
//! ```

use std::collections::HashMap;

use nbhd_core::models::{Interval, RegionKey, RegionTable};

use crate::{Bits, Overlapper};

/// Read-only per-chromosome overlap index. Queries on chromosomes without intervals simply
/// return nothing.
#[derive(Debug, Clone)]
pub struct ChromIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    index_maps: HashMap<String, Bits<u32, T>>,
}

impl<T> ChromIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    /// Bulk-build from `(chromosome, interval)` pairs in any order.
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Interval<u32, T>)>,
    {
        let mut intervals: HashMap<String, Vec<Interval<u32, T>>> = HashMap::new();
        for (chr, interval) in entries {
            intervals.entry(chr).or_default().push(interval);
        }

        let index_maps = intervals
            .into_iter()
            .map(|(chr, chr_intervals)| (chr, Bits::build(chr_intervals)))
            .collect();

        ChromIndex { index_maps }
    }

    pub fn find_iter<'a>(
        &'a self,
        chr: &str,
        start: u32,
        end: u32,
    ) -> impl Iterator<Item = &'a Interval<u32, T>> + use<'a, T> {
        self.index_maps
            .get(chr)
            .into_iter()
            .flat_map(move |bits| bits.find_iter(start, end))
    }

    pub fn count(&self, chr: &str, start: u32, end: u32) -> usize {
        self.index_maps
            .get(chr)
            .map_or(0, |bits| bits.count(start, end))
    }

    pub fn overlaps_any(&self, chr: &str, start: u32, end: u32) -> bool {
        self.find_iter(chr, start, end).next().is_some()
    }

    pub fn contains_chrom(&self, chr: &str) -> bool {
        self.index_maps.contains_key(chr)
    }

    /// Total number of indexed intervals.
    pub fn len(&self) -> usize {
        self.index_maps.values().map(|bits| bits.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a [`ChromIndex`] whose payload is the row number of each region.
pub trait IntoChromIndex {
    fn to_row_index(&self) -> ChromIndex<usize>;
}

impl IntoChromIndex for RegionTable {
    /// Zero-length regions are indexed as one base so they can still be hit.
    fn to_row_index(&self) -> ChromIndex<usize> {
        ChromIndex::build(self.regions.iter().enumerate().map(|(row, region)| {
            (
                region.chr.clone(),
                Interval {
                    start: region.start,
                    end: region.query_end(),
                    val: row,
                },
            )
        }))
    }
}

impl IntoChromIndex for [RegionKey] {
    /// Zero-length regions are indexed as one base so they can still be hit.
    fn to_row_index(&self) -> ChromIndex<usize> {
        ChromIndex::build(self.iter().enumerate().map(|(row, key)| {
            (
                key.chr.clone(),
                Interval {
                    start: key.start,
                    end: key.end.max(key.start.saturating_add(1)),
                    val: row,
                },
            )
        }))
    }
}
