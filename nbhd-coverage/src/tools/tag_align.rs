use std::collections::HashSet;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::debug;
use noodles::core::{Position, Region};
use noodles::csi::{self, BinningIndex as _};
use noodles::csi::binning_index::ReferenceSequence as _;

use nbhd_core::models::{ChromosomeOrder, RegionKey};
use nbhd_core::utils::get_dynamic_reader;
use nbhd_overlaprs::IntoChromIndex;

use super::TagIntervalTool;
use crate::deadline::Deadline;
use crate::errors::{CoverageError, Result};

const DEADLINE_STRIDE: usize = 100_000;

///
/// Counts tags of a bgzipped tagAlign file (`chr start end name score strand`) over regions.
///
/// With a CSI index next to the file (`tabix -C -p bed`, giving `tags.tagAlign.gz.csi`) each
/// region is an indexed query. Without one the whole file is streamed once and every tag is
/// intersected with the regions.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct TagAlignScanner;

fn index_error(path: &Path, e: impl std::fmt::Display) -> CoverageError {
    CoverageError::TagIndex {
        path: path.to_path_buf(),
        msg: e.to_string(),
    }
}

/// `tags.tagAlign.gz.csi`, if present.
fn find_index(tags: &Path) -> Option<PathBuf> {
    let mut appended = tags.as_os_str().to_owned();
    appended.push(".csi");
    Some(PathBuf::from(appended)).filter(|p| p.exists())
}

/// Split a tagAlign line into `(chr, start, end)`.
fn parse_tag<'a>(tags: &Path, line_no: usize, line: &'a str) -> Result<(&'a str, u32, u32)> {
    let malformed = |msg: &str| CoverageError::MalformedRecord {
        path: tags.to_path_buf(),
        line: line_no,
        msg: msg.to_string(),
    };

    let mut parts = line.split('\t');
    let chr = parts.next().ok_or_else(|| malformed("missing chromosome"))?;
    let start = parts
        .next()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .ok_or_else(|| malformed("bad start"))?;
    let end = parts
        .next()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .ok_or_else(|| malformed("bad end"))?;

    Ok((chr, start.min(end), start.max(end)))
}

impl TagAlignScanner {
    fn indexed_counts(
        &self,
        tags: &Path,
        index_path: &Path,
        regions: &[RegionKey],
        deadline: Deadline,
    ) -> Result<Vec<f64>> {
        let index = csi::read(index_path).map_err(|e| index_error(index_path, e))?;
        let known: HashSet<String> = index
            .header()
            .ok_or_else(|| index_error(index_path, "missing tabix header"))?
            .reference_sequence_names()
            .iter()
            .cloned()
            .collect();

        let mut reader = csi::io::IndexedReader::new(File::open(tags)?, index);
        let mut counts = Vec::with_capacity(regions.len());
        for key in regions {
            if deadline.expired() {
                return Err(CoverageError::Timeout(tags.to_path_buf()));
            }
            if !known.contains(&key.chr) {
                counts.push(0.0);
                continue;
            }

            // 1-based inclusive query covering the half-open region
            let start =
                Position::try_from(key.start as usize + 1).map_err(|e| index_error(tags, e))?;
            let end = Position::try_from(key.end.max(key.start + 1) as usize)
                .map_err(|e| index_error(tags, e))?;
            let region = Region::new(key.chr.as_str(), start..=end);

            let mut n = 0u64;
            for record in reader.query(&region).map_err(|e| index_error(tags, e))? {
                record.map_err(|e| index_error(tags, e))?;
                n += 1;
            }
            counts.push(n as f64);
        }
        Ok(counts)
    }

    fn streamed_counts(
        &self,
        tags: &Path,
        regions: &[RegionKey],
        deadline: Deadline,
    ) -> Result<Vec<f64>> {
        let index = regions.to_row_index();

        let reader = get_dynamic_reader(tags)?;
        let mut counts = vec![0.0; regions.len()];

        for (i, line) in reader.lines().enumerate() {
            if i % DEADLINE_STRIDE == 0 && deadline.expired() {
                return Err(CoverageError::Timeout(tags.to_path_buf()));
            }
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (chr, start, end) = parse_tag(tags, i + 1, &line)?;
            if !index.contains_chrom(chr) {
                continue;
            }
            for hit in index.find_iter(chr, start, end.max(start + 1)) {
                counts[hit.val] += 1.0;
            }
        }

        Ok(counts)
    }

    /// Per-chromosome record counts from the index metadata, when every indexed chromosome has it.
    fn indexed_record_counts(&self, index_path: &Path) -> Result<Option<Vec<(String, u64)>>> {
        let index = csi::read(index_path).map_err(|e| index_error(index_path, e))?;
        let Some(header) = index.header() else {
            return Ok(None);
        };
        let counts: Option<Vec<u64>> = index
            .reference_sequences()
            .iter()
            .map(|rs| rs.metadata().map(|m| m.mapped_record_count()))
            .collect();
        Ok(counts.map(|counts| {
            header
                .reference_sequence_names()
                .iter()
                .cloned()
                .zip(counts)
                .collect()
        }))
    }
}

impl TagIntervalTool for TagAlignScanner {
    fn region_counts(
        &self,
        tags: &Path,
        regions: &[RegionKey],
        deadline: Deadline,
    ) -> Result<Vec<f64>> {
        match find_index(tags) {
            Some(index_path) => self.indexed_counts(tags, &index_path, regions, deadline),
            None => {
                debug!("No index for {}; streaming all tags", tags.display());
                self.streamed_counts(tags, regions, deadline)
            }
        }
    }

    fn record_count(&self, tags: &Path, canonical: &ChromosomeOrder) -> Result<u64> {
        if let Some(index_path) = find_index(tags) {
            if let Some(per_chrom) = self.indexed_record_counts(&index_path)? {
                return Ok(per_chrom
                    .into_iter()
                    .filter(|(chr, _)| canonical.contains(chr))
                    .map(|(_, n)| n)
                    .sum());
            }
        }

        let reader = get_dynamic_reader(tags)?;
        let mut n = 0u64;
        for line in reader.lines() {
            let line = line?;
            let chr = line.split('\t').next().unwrap_or_default();
            if canonical.contains(chr) {
                n += 1;
            }
        }
        Ok(n)
    }
}
