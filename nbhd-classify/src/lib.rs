//! # Region classification
//!
//! Labels candidate regions as promoter, genic or intergenic from a gene table:
//!
//! ```
//! use nbhd_classify::{GeneIndex, RegionClass};
//! use nbhd_core::models::{GenomicInterval, RegionTable};
//!
//! let mut genes = RegionTable::new(
//!     vec![GenomicInterval::with_fields(
//!         "chr1", 1000, 5000, vec!["A".into(), "0".into(), "+".into()],
//!     )],
//!     vec!["name".into(), "score".into(), "strand".into()],
//! );
//! genes.derive_tss().unwrap();
//!
//! let index = GeneIndex::from_genes(&genes, 500).unwrap();
//! assert_eq!(index.classify("chr1", 600, 700), (RegionClass::Promoter, vec!["A".to_string()]));
//! assert_eq!(index.classify("chr1", 2000, 2100).0, RegionClass::Genic);
//! assert_eq!(index.classify("chr1", 9000, 9100).0, RegionClass::Intergenic);
//! ```

pub mod class;
pub mod classify;
pub mod errors;
pub mod gene_index;

pub use class::RegionClass;
pub use classify::{ClassSummary, assign_classes};
pub use errors::{ClassifyError, Result};
pub use gene_index::{DEFAULT_PROMOTER_HALF_WIDTH, GeneIndex, promoter_windows};
