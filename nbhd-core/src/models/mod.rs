pub mod chromosomes;
pub mod column;
pub mod interval;
pub mod region;
pub mod region_table;

// re-export for cleaner imports
pub use self::chromosomes::{ChromSizes, ChromosomeOrder};
pub use self::column::{Column, ColumnData};
pub use self::interval::Interval;
pub use self::region::{GenomicInterval, RegionKey};
pub use self::region_table::{ParseOptions, RegionTable};
