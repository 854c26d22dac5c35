use num_traits::{PrimInt, Unsigned, identities::zero};

use super::Overlapper;
use nbhd_core::models::Interval;

/// A Binary Interval Search index.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/29/1/1/273289>
///
/// Intervals are kept sorted by start, together with independently sorted start and end
/// coordinates. Overlap enumeration jumps to the first candidate with a binary search shifted
/// left by the longest interval; overlap counting needs only two binary searches.
///
/// ```
/// use nbhd_overlaprs::{Bits, Overlapper, Interval};
///
/// let reads = vec![
///     Interval { start: 100u32, end: 150, val: 0usize },
///     Interval { start: 200, end: 250, val: 1 },
///     Interval { start: 225, end: 275, val: 2 },
/// ];
/// let bits = Bits::build(reads);
///
/// assert_eq!(bits.find(210, 240).len(), 2);
/// assert_eq!(bits.count(210, 240), 2);
/// assert_eq!(bits.count(150, 200), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    intervals: Vec<Interval<I, T>>,
    starts: Vec<I>,
    ends: Vec<I>,
    max_len: I,
}

impl<I, T> Overlapper<I, T> for Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(mut intervals: Vec<Interval<I, T>>) -> Self {
        intervals.sort();
        let mut starts: Vec<I> = intervals.iter().map(|iv| iv.start).collect();
        let mut ends: Vec<I> = intervals.iter().map(|iv| iv.end).collect();
        starts.sort();
        ends.sort();
        let max_len = intervals
            .iter()
            .map(|iv| iv.len())
            .max()
            .unwrap_or_else(zero::<I>);

        Bits {
            intervals,
            starts,
            ends,
            max_len,
        }
    }

    #[inline]
    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>> {
        self.iter_find(start, end).cloned().collect()
    }

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        Box::new(self.iter_find(start, end))
    }

    #[inline]
    fn count(&self, start: I, end: I) -> usize {
        // overlapping = (starts before `end`) - (ends at or before `start`)
        let begun = self.starts.partition_point(|&s| s < end);
        let finished = self.ends.partition_point(|&e| e <= start);
        begun.saturating_sub(finished)
    }
}

impl<I, T> Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// All intervals, sorted by start.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval<I, T>> {
        self.intervals.iter()
    }

    fn iter_find(&self, start: I, end: I) -> IterFind<'_, I, T> {
        let floor = start.checked_sub(&self.max_len).unwrap_or_else(zero::<I>);
        IterFind {
            inner: self,
            off: self.intervals.partition_point(|iv| iv.start < floor),
            start,
            end,
        }
    }
}

/// Iterator over the intervals of a [`Bits`] overlapping a query, created by
/// [`find_iter`](Overlapper::find_iter).
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    inner: &'a Bits<I, T>,
    off: usize,
    start: I,
    end: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Interval<I, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(interval) = self.inner.intervals.get(self.off) {
            self.off += 1;
            if interval.overlap(self.start, self.end) {
                return Some(interval);
            }
            if interval.start >= self.end {
                break;
            }
        }
        None
    }
}

impl<'a, I, T> IntoIterator for &'a Bits<I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Interval<I, T>;
    type IntoIter = std::slice::Iter<'a, Interval<I, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
