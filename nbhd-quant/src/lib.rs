//! # Feature quantification
//!
//! Turns raw per-region counts from [`nbhd_coverage`] into depth- and length-normalised scores.
//! For a feature `F` with replicate track basename `B` (replicate key `F.B`) a table gains:
//!
//! - `F.B.readCount`, `F.B.RPM`, `F.B.RPKM` and a `.quantile` column for each
//! - `F.RPM`, `F.RPKM` (replicate means) and their `.quantile` columns
//!
//! `RPM = 1e6 × count / total` and `RPKM = 1e3 × RPM / length`, with zero-length regions
//! treated as one base long. Quantiles are average-method ranks divided by the table size.

pub mod activity;
pub mod cache;
pub mod config;
pub mod errors;
pub mod feature_map;
pub mod quantifier;
pub mod rank;

pub use activity::{PROMOTER_ACTIVITY_COLUMN, promoter_activity_quantile};
pub use config::QuantifierConfig;
pub use errors::{QuantError, Result};
pub use feature_map::{FeatureEntry, FeatureMap, summary_label};
pub use quantifier::{CountArtifact, FeatureQuantifier};
pub use rank::percentile_rank;
