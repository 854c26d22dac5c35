use std::path::Path;

use bigtools::BigWigRead;
use bigtools::utils::reopen::ReopenableFile;

use super::{SignalReader, SignalSource};
use crate::errors::{CoverageError, Result};

/// Opens bigWig files with bigtools.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigToolsReader;

pub struct BigWigSource {
    path: std::path::PathBuf,
    reader: BigWigRead<ReopenableFile>,
}

impl SignalReader for BigToolsReader {
    fn open(&self, track: &Path) -> Result<Box<dyn SignalSource>> {
        let reader = BigWigRead::open_file(track).map_err(|e| CoverageError::Signal {
            path: track.to_path_buf(),
            msg: format!("{:?}", e),
        })?;
        Ok(Box::new(BigWigSource {
            path: track.to_path_buf(),
            reader,
        }))
    }
}

impl SignalSource for BigWigSource {
    /// Base-weighted mean of the values overlapping `[start, end)`; uncovered bases do not count.
    fn mean(&mut self, chr: &str, start: u32, end: u32) -> Result<Option<f64>> {
        let path = &self.path;
        let signal_error = |e: &dyn std::fmt::Debug| CoverageError::Signal {
            path: path.clone(),
            msg: format!("{:?}", e),
        };

        let values = self
            .reader
            .get_interval(chr, start, end)
            .map_err(|e| signal_error(&e))?;

        let mut covered = 0u64;
        let mut sum = 0.0f64;
        for value in values {
            let value = value.map_err(|e| signal_error(&e))?;
            let lo = value.start.max(start);
            let hi = value.end.min(end);
            if hi > lo {
                let bases = (hi - lo) as u64;
                covered += bases;
                sum += value.value as f64 * bases as f64;
            }
        }

        if covered == 0 {
            Ok(None)
        } else {
            Ok(Some(sum / covered as f64))
        }
    }

    fn chrom_lengths(&self) -> Vec<(String, u32)> {
        self.reader
            .chroms()
            .iter()
            .map(|c| (c.name.clone(), c.length))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs::File;
    use std::path::PathBuf;

    use bigtools::beddata::BedParserStreamingIterator;
    use bigtools::{BigWigWrite, InputSortType};
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::TempDir;
    use tokio::runtime;

    use nbhd_core::models::{ChromSizes, ChromosomeOrder, GenomicInterval, RegionTable};

    use crate::backends::count_signal;
    use crate::deadline::Deadline;
    use crate::totals::signal_total;

    /// `signal.bw` converted from a small bedGraph.
    #[fixture]
    fn signal_track() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let bedgraph = dir.path().join("signal.bedGraph");
        std::fs::write(
            &bedgraph,
            "chr1\t0\t100\t2\nchr1\t100\t200\t4\nchr1\t500\t600\t1\nchr2\t0\t50\t-1\n",
        )
        .unwrap();

        let path = dir.path().join("signal.bw");
        let chrom_map: HashMap<String, u32> =
            [("chr1".to_string(), 1000), ("chr2".to_string(), 500)]
                .into_iter()
                .collect();
        let mut outb = BigWigWrite::create_file(&path, chrom_map).unwrap();
        outb.options.channel_size = 0;
        outb.options.input_sort_type = InputSortType::START;
        let runtime = runtime::Builder::new_current_thread().build().unwrap();
        let vals =
            BedParserStreamingIterator::from_bedgraph_file(File::open(&bedgraph).unwrap(), false);
        outb.write(vals, runtime).unwrap();

        (dir, path)
    }

    #[rstest]
    fn test_mean_over_covered_bases(signal_track: (TempDir, PathBuf)) {
        let (_dir, path) = signal_track;
        let mut source = BigToolsReader.open(&path).unwrap();

        assert_eq!(source.mean("chr1", 50, 150).unwrap(), Some(3.0));
        assert_eq!(source.mean("chr1", 150, 550).unwrap(), Some(2.5));
        assert_eq!(source.mean("chr1", 300, 400).unwrap(), None);

        let mut lengths = source.chrom_lengths();
        lengths.sort();
        assert_eq!(
            lengths,
            vec![("chr1".to_string(), 1000), ("chr2".to_string(), 500)]
        );
    }

    #[rstest]
    fn test_missing_track_is_signal_error() {
        let result = BigToolsReader.open(Path::new("does/not/exist.bw"));
        assert!(matches!(result, Err(CoverageError::Signal { .. })));
    }

    #[rstest]
    fn test_count_signal_on_bigwig(signal_track: (TempDir, PathBuf)) {
        let (_dir, path) = signal_track;
        let table = RegionTable::new(
            vec![
                GenomicInterval::new("chr1", 0, 200),
                GenomicInterval::new("chr1", 150, 150),
                GenomicInterval::new("chr1", 300, 400),
            ],
            vec![],
        );
        let counts = count_signal(&BigToolsReader, &path, &table, Deadline::none()).unwrap();
        assert_eq!(counts, vec![600.0, 4.0, 0.0]);
    }

    #[rstest]
    fn test_signal_total_on_bigwig(signal_track: (TempDir, PathBuf)) {
        let (_dir, path) = signal_track;
        // chr1 is longer here than in the track
        let sizes = ChromSizes::from_entries(vec![("chr1", 5000), ("chr2", 500)]);
        let total =
            signal_total(&BigToolsReader, &path, &sizes, &ChromosomeOrder::human()).unwrap();
        // chr1: 700 over 300 covered bases, chr2: -1 everywhere covered
        assert!((total - (7000.0 / 3.0 - 500.0)).abs() < 1e-6);
    }
}
