//! Normalisation denominators, one per track kind.

use std::collections::HashMap;
use std::path::Path;

use log::info;

use nbhd_core::models::{ChromSizes, ChromosomeOrder};

use crate::errors::{CoverageError, Result};
use crate::tools::{AlignmentTool, SignalReader, TagIntervalTool};

fn zero_total(track: &Path, total: f64) -> CoverageError {
    CoverageError::ZeroTotal {
        track: track.to_path_buf(),
        total,
    }
}

/// Mapped reads on canonical chromosomes, from the alignment index summary. Must be positive.
pub fn alignment_total(
    tool: &dyn AlignmentTool,
    alignments: &Path,
    canonical: &ChromosomeOrder,
) -> Result<f64> {
    let total: u64 = tool
        .mapped_read_counts(alignments)?
        .into_iter()
        .filter(|(chr, _)| canonical.contains(chr))
        .map(|(_, n)| n)
        .sum();

    info!("{} mapped reads in {}", total, alignments.display());
    if total == 0 {
        return Err(zero_total(alignments, 0.0));
    }
    Ok(total as f64)
}

/// Tags on canonical chromosomes. Must be positive.
pub fn tag_interval_total(
    tool: &dyn TagIntervalTool,
    tags: &Path,
    canonical: &ChromosomeOrder,
) -> Result<f64> {
    let total = tool.record_count(tags, canonical)?;
    if total == 0 {
        return Err(zero_total(tags, 0.0));
    }
    Ok(total as f64)
}

///
/// `Σ chromLength × meanSignal(chrom)` over the canonical chromosomes of `sizes` that the track
/// carries, each queried up to the shorter of its two recorded lengths. Strand-specific tracks
/// may be negative, so only the magnitude must be non-zero.
///
pub fn signal_total(
    reader: &dyn SignalReader,
    track: &Path,
    sizes: &ChromSizes,
    canonical: &ChromosomeOrder,
) -> Result<f64> {
    let mut source = reader.open(track)?;
    let track_lengths: HashMap<String, u32> = source.chrom_lengths().into_iter().collect();

    let mut total = 0.0;
    for (chr, size) in sizes.restrict_to(canonical).iter() {
        let Some(&track_length) = track_lengths.get(chr) else {
            continue;
        };
        let length = size.min(track_length);
        let mean = source.mean(chr, 0, length)?.unwrap_or(0.0);
        total += length as f64 * mean;
    }

    if !total.is_finite() || total.abs() <= f64::EPSILON {
        return Err(zero_total(track, total));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::fakes::{FakeAligner, FakeSignal, FakeTags};
    use crate::status::ToolRun;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alignment_total_is_canonical_only() {
        let mut tool = FakeAligner::new(
            &[],
            Box::new(|_| ToolRun::default()),
            Box::new(|_| ToolRun::default()),
        );
        tool.mapped = vec![
            ("chr1".to_string(), 300),
            ("chrUn_KI270302v1".to_string(), 50),
            ("chrX".to_string(), 200),
        ];
        let total = alignment_total(&tool, Path::new("r.bam"), &ChromosomeOrder::human()).unwrap();
        assert_eq!(total, 500.0);

        tool.mapped = vec![("chrUn_KI270302v1".to_string(), 50)];
        let result = alignment_total(&tool, Path::new("r.bam"), &ChromosomeOrder::human());
        assert!(matches!(result, Err(CoverageError::ZeroTotal { .. })));
    }

    #[test]
    fn test_zero_tag_total_is_fatal() {
        let tool = FakeTags {
            counts: vec![],
            records: 0,
        };
        let result =
            tag_interval_total(&tool, Path::new("d.tagAlign.gz"), &ChromosomeOrder::human());
        assert!(matches!(result, Err(CoverageError::ZeroTotal { .. })));
    }

    #[test]
    fn test_negative_signal_total_is_accepted() {
        let reader = FakeSignal {
            means: [("chr1".to_string(), -0.5), ("chr2".to_string(), -1.0)]
                .into_iter()
                .collect(),
            lengths: vec![("chr1".to_string(), 100), ("chr2".to_string(), 10)],
            ..Default::default()
        };
        let sizes = ChromSizes::from_entries(vec![("chr1", 100), ("chr2", 10), ("chr3", 1000)]);
        let total =
            signal_total(&reader, Path::new("m.bw"), &sizes, &ChromosomeOrder::human()).unwrap();
        assert_eq!(total, -60.0);
    }

    #[test]
    fn test_flat_signal_total_is_fatal() {
        let reader = FakeSignal {
            lengths: vec![("chr1".to_string(), 100)],
            ..Default::default()
        };
        let sizes = ChromSizes::from_entries(vec![("chr1", 100)]);
        let result = signal_total(&reader, Path::new("m.bw"), &sizes, &ChromosomeOrder::human());
        assert!(matches!(result, Err(CoverageError::ZeroTotal { .. })));
    }

    #[test]
    fn test_signal_total_uses_shorter_length() {
        let reader = FakeSignal {
            means: [("chr1".to_string(), 2.0)].into_iter().collect(),
            lengths: vec![("chr1".to_string(), 100)],
            ..Default::default()
        };
        let sizes = ChromSizes::from_entries(vec![("chr1", 1000)]);
        let total =
            signal_total(&reader, Path::new("m.bw"), &sizes, &ChromosomeOrder::human()).unwrap();
        assert_eq!(total, 200.0);
        assert_eq!(
            reader.queries.lock().unwrap().clone(),
            vec![("chr1".to_string(), 0, 100)]
        );
    }
}
