use std::sync::Arc;
use std::time::Duration;

use nbhd_core::models::{ChromSizes, ChromosomeOrder, RegionTable};

use crate::backends::{count_alignment, count_signal, count_tag_interval};
use crate::deadline::Deadline;
use crate::errors::Result;
use crate::totals::{alignment_total, signal_total, tag_interval_total};
use crate::tools::{
    AlignmentTool, BigToolsReader, NoodlesBam, SignalReader, TagAlignScanner, TagIntervalTool,
};
use crate::track::{FeatureTrack, TrackKind};

///
/// Dispatches counting and total-signal requests to the backend matching each track's kind.
///
/// ```
/// use nbhd_core::models::ChromosomeOrder;
/// use nbhd_coverage::CoverageEngine;
/// use std::time::Duration;
///
/// let engine = CoverageEngine::native(ChromosomeOrder::human())
///     .with_timeout(Some(Duration::from_secs(600)));
/// assert_eq!(engine.canonical().len(), 25);
/// ```
///
#[derive(Clone)]
pub struct CoverageEngine {
    alignment: Arc<dyn AlignmentTool>,
    tag_interval: Arc<dyn TagIntervalTool>,
    signal: Arc<dyn SignalReader>,
    canonical: ChromosomeOrder,
    timeout: Option<Duration>,
}

impl CoverageEngine {
    /// Engine backed by the in-process noodles, tagAlign and bigtools readers.
    pub fn native(canonical: ChromosomeOrder) -> Self {
        CoverageEngine {
            alignment: Arc::new(NoodlesBam),
            tag_interval: Arc::new(TagAlignScanner),
            signal: Arc::new(BigToolsReader),
            canonical,
            timeout: None,
        }
    }

    pub fn with_alignment_tool(mut self, tool: Arc<dyn AlignmentTool>) -> Self {
        self.alignment = tool;
        self
    }

    pub fn with_tag_interval_tool(mut self, tool: Arc<dyn TagIntervalTool>) -> Self {
        self.tag_interval = tool;
        self
    }

    pub fn with_signal_reader(mut self, reader: Arc<dyn SignalReader>) -> Self {
        self.signal = reader;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn canonical(&self) -> &ChromosomeOrder {
        &self.canonical
    }

    /// One count per region of `table`, in table order.
    pub fn count(
        &self,
        track: &FeatureTrack,
        table: &RegionTable,
        sizes: &ChromSizes,
    ) -> Result<Vec<f64>> {
        let deadline = Deadline::after(self.timeout);
        match track.kind() {
            TrackKind::Alignment => count_alignment(
                self.alignment.as_ref(),
                track.path(),
                table,
                sizes,
                &self.canonical,
                deadline,
            ),
            TrackKind::TagInterval => {
                count_tag_interval(self.tag_interval.as_ref(), track.path(), table, deadline)
            }
            TrackKind::SignalTrack => {
                count_signal(self.signal.as_ref(), track.path(), table, deadline)
            }
        }
    }

    /// The normalisation denominator for `track`.
    pub fn total(&self, track: &FeatureTrack, sizes: &ChromSizes) -> Result<f64> {
        match track.kind() {
            TrackKind::Alignment => {
                alignment_total(self.alignment.as_ref(), track.path(), &self.canonical)
            }
            TrackKind::TagInterval => {
                tag_interval_total(self.tag_interval.as_ref(), track.path(), &self.canonical)
            }
            TrackKind::SignalTrack => {
                signal_total(self.signal.as_ref(), track.path(), sizes, &self.canonical)
            }
        }
    }
}

impl std::fmt::Debug for CoverageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverageEngine")
            .field("canonical", &self.canonical.names())
            .field("timeout", &self.timeout)
            .finish()
    }
}
