use std::fmt::{self, Display};

/// Identity of a row for merging: `(chr, start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

impl RegionKey {
    pub fn new(chr: impl Into<String>, start: u32, end: u32) -> Self {
        RegionKey {
            chr: chr.into(),
            start,
            end,
        }
    }
}

impl Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}

///
/// One row of an interval file: `chr`, half-open `[start, end)` and the raw extra fields
/// (`name`, `score`, `strand`, ...) in file order.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicInterval {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub fields: Vec<String>,
}

impl GenomicInterval {
    /// Build an interval with no extra fields. Endpoints are stored in ascending order.
    pub fn new(chr: impl Into<String>, start: u32, end: u32) -> Self {
        Self::with_fields(chr, start, end, Vec::new())
    }

    pub fn with_fields(chr: impl Into<String>, start: u32, end: u32, fields: Vec<String>) -> Self {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        GenomicInterval {
            chr: chr.into(),
            start,
            end,
            fields,
        }
    }

    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Length used for per-kilobase normalisation. Zero-length regions count as one base.
    pub fn effective_length(&self) -> u32 {
        self.width().max(1)
    }

    /// End coordinate for coverage and overlap queries: `max(end, start + 1)`.
    pub fn query_end(&self) -> u32 {
        self.end.max(self.start.saturating_add(1))
    }

    pub fn key(&self) -> RegionKey {
        RegionKey::new(self.chr.clone(), self.start, self.end)
    }

    /// `chr:start-end`
    pub fn coords(&self) -> String {
        format!("{}:{}-{}", self.chr, self.start, self.end)
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chr, self.start, self.end)?;
        for field in &self.fields {
            write!(f, "\t{}", field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(100, 200, 100, 200)]
    #[case(200, 100, 100, 200)]
    #[case(50, 50, 50, 50)]
    fn test_endpoints_are_normalised(
        #[case] start: u32,
        #[case] end: u32,
        #[case] exp_start: u32,
        #[case] exp_end: u32,
    ) {
        let region = GenomicInterval::new("chr1", start, end);
        assert_eq!((region.start, region.end), (exp_start, exp_end));
        assert!(region.start <= region.end);
    }

    #[test]
    fn test_zero_length_region_is_widened_for_queries() {
        let region = GenomicInterval::new("chr1", 100, 100);
        assert_eq!(region.width(), 0);
        assert_eq!(region.effective_length(), 1);
        assert_eq!(region.query_end(), 101);

        let region = GenomicInterval::new("chr1", 100, 300);
        assert_eq!(region.effective_length(), 200);
        assert_eq!(region.query_end(), 300);
    }

    #[test]
    fn test_display() {
        let region = GenomicInterval::with_fields(
            "chr2",
            5,
            10,
            vec!["peak1".to_string(), "0".to_string()],
        );
        assert_eq!(region.to_string(), "chr2\t5\t10\tpeak1\t0");
        assert_eq!(region.coords(), "chr2:5-10");
        assert_eq!(region.key().to_string(), "chr2:5-10");
    }
}
