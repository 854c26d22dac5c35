//! Interval overlap indexes for nbhd.
//!
//! All overlap computation lives here. The coverage backends use it to count alignment records
//! per region and the region classifier uses it for promoter-window and gene-body lookups.
//!
//! ```rust
//! use nbhd_overlaprs::{Bits, Overlapper, Interval};
//!
//! let windows = vec![
//!     Interval { start: 500u32, end: 1500, val: "A" },
//!     Interval { start: 7500, end: 8500, val: "B" },
//! ];
//! let index = Bits::build(windows);
//!
//! let hits: Vec<&str> = index.find_iter(600, 700).map(|iv| iv.val).collect();
//! assert_eq!(hits, vec!["A"]);
//! assert_eq!(index.count(0, 10_000), 2);
//! ```

/// Binary Interval Search implementation.
///
/// See [`Bits`] for details.
pub mod bits;

/// Per-chromosome indexes.
///
/// See [`ChromIndex`] for details.
pub mod chrom_index;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

// re-exports
pub use self::bits::Bits;
pub use self::chrom_index::{ChromIndex, IntoChromIndex};
pub use self::traits::{Interval, Overlapper};
