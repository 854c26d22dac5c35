//! # Coverage counting over feature tracks
//!
//! Counts signal over the regions of a [`RegionTable`](nbhd_core::models::RegionTable) from
//! three kinds of tracks, chosen by file name:
//!
//! | suffix | kind | counting | total |
//! |---|---|---|---|
//! | `.bam` | [`TrackKind::Alignment`] | overlapping reads, sorted then unsorted | mapped reads from the index |
//! | `.tagAlign.gz`, `.tagAlign.bgz` | [`TrackKind::TagInterval`] | overlapping tags | canonical tags |
//! | `.bw`, `.bigWig`, `.bigwig` | [`TrackKind::SignalTrack`] | mean × length | Σ length × mean |
//!
//! External facilities sit behind the traits in [`tools`]; [`CoverageEngine::native`] wires in
//! the noodles, tagAlign and bigtools implementations.

pub mod backends;
pub mod deadline;
pub mod engine;
pub mod errors;
pub mod status;
pub mod tools;
pub mod totals;
pub mod track;

pub use deadline::Deadline;
pub use engine::CoverageEngine;
pub use errors::{CoverageError, Result};
pub use status::{FAILURE_MARKERS, ToolRun};
pub use track::{FeatureTrack, TrackKind};
