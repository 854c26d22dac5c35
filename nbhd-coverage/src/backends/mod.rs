//! The three CoverageBackend variants. Each returns one count per region, in table order.

pub mod alignment;
pub mod signal;
pub mod tag_interval;

pub use self::alignment::count_alignment;
pub use self::signal::count_signal;
pub use self::tag_interval::count_tag_interval;
