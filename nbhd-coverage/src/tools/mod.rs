//! Contracts for the external counting facilities, and the native implementations used by
//! default. Backends only ever talk to these traits, so tests can swap in fakes.

pub mod bigwig;
pub mod noodles_bam;
pub mod tag_align;

use std::path::Path;

use nbhd_core::models::{ChromSizes, ChromosomeOrder, RegionKey};

use crate::deadline::Deadline;
use crate::errors::Result;
use crate::status::ToolRun;

pub use self::bigwig::BigToolsReader;
pub use self::noodles_bam::NoodlesBam;
pub use self::tag_align::TagAlignScanner;

/// Diagnostic used by native tools when a [`Deadline`] runs out mid-run.
pub const DEADLINE_DIAGNOSTIC: &str = "terminated: time limit exceeded";

///
/// Interval coverage over an alignment file.
///
pub trait AlignmentTool: Send + Sync {
    /// Reference sequence names in the order of the alignment header.
    fn header_order(&self, alignments: &Path) -> Result<Vec<String>>;

    /// Count reads overlapping each region, assuming regions are sorted in `genome` order and
    /// the alignments are coordinate sorted and indexed.
    fn sorted_coverage(
        &self,
        alignments: &Path,
        regions: &[RegionKey],
        genome: &ChromSizes,
        deadline: Deadline,
    ) -> ToolRun;

    /// Count reads overlapping each region without relying on any input ordering.
    fn unsorted_coverage(
        &self,
        alignments: &Path,
        regions: &[RegionKey],
        genome: &ChromSizes,
        deadline: Deadline,
    ) -> ToolRun;

    /// Mapped-read count per reference sequence.
    fn mapped_read_counts(&self, alignments: &Path) -> Result<Vec<(String, u64)>>;
}

///
/// Range queries over a compressed tag-interval file.
///
pub trait TagIntervalTool: Send + Sync {
    fn region_counts(&self, tags: &Path, regions: &[RegionKey], deadline: Deadline)
    -> Result<Vec<f64>>;

    /// Number of records whose chromosome is in `canonical`.
    fn record_count(&self, tags: &Path, canonical: &ChromosomeOrder) -> Result<u64>;
}

/// Opens continuous-signal tracks.
pub trait SignalReader: Send + Sync {
    fn open(&self, track: &Path) -> Result<Box<dyn SignalSource>>;
}

/// An opened continuous-signal track.
pub trait SignalSource {
    /// Mean signal over `[start, end)`, or `None` when nothing in the range carries a value.
    fn mean(&mut self, chr: &str, start: u32, end: u32) -> Result<Option<f64>>;

    fn chrom_lengths(&self) -> Vec<(String, u32)>;
}
