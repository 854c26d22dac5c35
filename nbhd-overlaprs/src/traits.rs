use num_traits::{PrimInt, Unsigned};

pub use nbhd_core::models::Interval;

/// Bulk-built, read-only overlap index.
pub trait Overlapper<I, T>: Send + Sync
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized;

    /// All intervals overlapping `[start, end)`.
    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>>;

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a>;

    /// Number of intervals overlapping `[start, end)`.
    fn count(&self, start: I, end: I) -> usize;
}
