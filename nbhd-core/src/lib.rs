//! Core models for nbhd.
//!
//! This crate holds the in-memory representation of genomic interval tables used by every other
//! nbhd crate: [`RegionTable`](models::RegionTable) and its rows, the explicit
//! [`ChromosomeOrder`](models::ChromosomeOrder) that replaces any process-wide chromosome list,
//! and [`ChromSizes`](models::ChromSizes) read from a chromosome-size file.
//!
//! ```
//! use nbhd_core::models::{ChromosomeOrder, GenomicInterval};
//!
//! let order = ChromosomeOrder::human();
//! assert!(order.rank("chr2") < order.rank("chrX"));
//!
//! let region = GenomicInterval::new("chr1", 200, 100);
//! assert_eq!((region.start, region.end), (100, 200));
//! ```
pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::{RegionTableError, Result};
