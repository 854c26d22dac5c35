use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use noodles::bam;
use noodles::core::{Position, Region};
use noodles::csi::binning_index::ReferenceSequence as _;
use noodles::sam::alignment::Record as SamRecord;

use nbhd_core::models::{ChromSizes, RegionKey};
use nbhd_overlaprs::IntoChromIndex;

use super::{AlignmentTool, DEADLINE_DIAGNOSTIC};
use crate::deadline::Deadline;
use crate::errors::{CoverageError, Result};
use crate::status::ToolRun;

/// How many records to stream between deadline checks.
const DEADLINE_STRIDE: usize = 100_000;

/// Exit code reported when a run is stopped by its deadline.
const TIMEOUT_EXIT_CODE: i32 = 124;

///
/// Alignment coverage computed in-process with noodles.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct NoodlesBam;

fn alignment_error(path: &Path, e: impl std::fmt::Display) -> CoverageError {
    CoverageError::Alignment {
        path: path.to_path_buf(),
        msg: e.to_string(),
    }
}

fn header_names(header: &noodles::sam::Header) -> Vec<String> {
    header
        .reference_sequences()
        .keys()
        .map(|name| name.to_string())
        .collect()
}

/// 0-based half-open span of a mapped record, or `None` for unmapped/unplaced records.
fn record_span(record: &bam::Record) -> io::Result<Option<(usize, u32, u32)>> {
    if record.flags().is_unmapped() {
        return Ok(None);
    }
    let Some(reference_id) = record.reference_sequence_id().transpose()? else {
        return Ok(None);
    };
    let Some(start) = record.alignment_start().transpose()? else {
        return Ok(None);
    };
    let Some(end) = SamRecord::alignment_end(record).transpose()? else {
        return Ok(None);
    };
    let start = u32::try_from(start.get() - 1).map_err(io::Error::other)?;
    let end = u32::try_from(end.get()).map_err(io::Error::other)?;
    Ok(Some((reference_id, start, end.max(start + 1))))
}

/// Index file next to the alignments: `reads.bam.bai`, then `reads.bai`.
fn find_index(alignments: &Path) -> Option<PathBuf> {
    let mut appended = alignments.as_os_str().to_owned();
    appended.push(".bai");
    [PathBuf::from(appended), alignments.with_extension("bai")]
        .into_iter()
        .find(|p| p.exists())
}

impl NoodlesBam {
    fn indexed_counts(
        &self,
        alignments: &Path,
        regions: &[RegionKey],
        deadline: Deadline,
    ) -> std::result::Result<Vec<f64>, ToolRun> {
        let fail = |e: &dyn std::fmt::Display| ToolRun::failure(1, format!("ERROR: {e}"));

        let mut reader = bam::io::indexed_reader::Builder::default()
            .build_from_path(alignments)
            .map_err(|e| fail(&e))?;
        let header = reader.read_header().map_err(|e| fail(&e))?;
        let known: HashSet<String> = header_names(&header).into_iter().collect();

        let mut counts = Vec::with_capacity(regions.len());
        for key in regions {
            if deadline.expired() {
                return Err(ToolRun::failure(TIMEOUT_EXIT_CODE, DEADLINE_DIAGNOSTIC));
            }
            if !known.contains(&key.chr) {
                counts.push(0.0);
                continue;
            }

            // 1-based inclusive query covering the half-open region
            let start = Position::try_from(key.start as usize + 1).map_err(|e| fail(&e))?;
            let end = Position::try_from(key.end.max(key.start + 1) as usize)
                .map_err(|e| fail(&e))?;
            let region = Region::new(key.chr.as_str(), start..=end);

            let query = reader.query(&header, &region).map_err(|e| fail(&e))?;
            let mut n = 0u64;
            for record in query {
                let record = record.map_err(|e| fail(&e))?;
                if !record.flags().is_unmapped() {
                    n += 1;
                }
            }
            counts.push(n as f64);
        }
        Ok(counts)
    }

    fn streamed_counts(
        &self,
        alignments: &Path,
        regions: &[RegionKey],
        genome: &ChromSizes,
        deadline: Deadline,
    ) -> std::result::Result<Vec<f64>, ToolRun> {
        let fail = |e: &dyn std::fmt::Display| ToolRun::failure(1, format!("ERROR: {e}"));

        let index = regions.to_row_index();

        let mut reader = bam::io::reader::Builder::default()
            .build_from_path(alignments)
            .map_err(|e| fail(&e))?;
        let header = reader.read_header().map_err(|e| fail(&e))?;

        // reference id -> name, only for chromosomes inside the genome
        let names: Vec<Option<String>> = header_names(&header)
            .into_iter()
            .map(|name| genome.length(&name).map(|_| name))
            .collect();

        let mut counts = vec![0.0; regions.len()];
        for (i, record) in reader.records().enumerate() {
            if i % DEADLINE_STRIDE == 0 && deadline.expired() {
                return Err(ToolRun::failure(TIMEOUT_EXIT_CODE, DEADLINE_DIAGNOSTIC));
            }
            let record = record.map_err(|e| fail(&e))?;
            let Some((reference_id, start, end)) = record_span(&record).map_err(|e| fail(&e))?
            else {
                continue;
            };
            let Some(Some(chr)) = names.get(reference_id) else {
                continue;
            };
            for hit in index.find_iter(chr, start, end) {
                counts[hit.val] += 1.0;
            }
        }
        Ok(counts)
    }
}

impl AlignmentTool for NoodlesBam {
    fn header_order(&self, alignments: &Path) -> Result<Vec<String>> {
        let mut reader = bam::io::reader::Builder::default()
            .build_from_path(alignments)
            .map_err(|e| alignment_error(alignments, e))?;
        let header = reader
            .read_header()
            .map_err(|e| alignment_error(alignments, e))?;
        Ok(header_names(&header))
    }

    fn sorted_coverage(
        &self,
        alignments: &Path,
        regions: &[RegionKey],
        _genome: &ChromSizes,
        deadline: Deadline,
    ) -> ToolRun {
        match self.indexed_counts(alignments, regions, deadline) {
            Ok(counts) => ToolRun::success(counts),
            Err(run) => run,
        }
    }

    fn unsorted_coverage(
        &self,
        alignments: &Path,
        regions: &[RegionKey],
        genome: &ChromSizes,
        deadline: Deadline,
    ) -> ToolRun {
        match self.streamed_counts(alignments, regions, genome, deadline) {
            Ok(counts) => ToolRun::success(counts),
            Err(run) => run,
        }
    }

    fn mapped_read_counts(&self, alignments: &Path) -> Result<Vec<(String, u64)>> {
        let names = self.header_order(alignments)?;

        if let Some(index_path) = find_index(alignments) {
            let index = bam::bai::read(&index_path).map_err(|e| alignment_error(&index_path, e))?;
            let counts = index
                .reference_sequences()
                .iter()
                .map(|rs| rs.metadata().map_or(0, |m| m.mapped_record_count()));
            return Ok(names.into_iter().zip(counts).collect());
        }

        debug!(
            "No index found for {}; counting mapped reads by streaming",
            alignments.display()
        );
        let file = File::open(alignments).map_err(|e| alignment_error(alignments, e))?;
        let mut reader = bam::io::reader::Builder::default().build_from_reader(file);
        reader
            .read_header()
            .map_err(|e| alignment_error(alignments, e))?;

        let mut per_reference: HashMap<usize, u64> = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| alignment_error(alignments, e))?;
            if let Some((reference_id, _, _)) =
                record_span(&record).map_err(|e| alignment_error(alignments, e))?
            {
                *per_reference.entry(reference_id).or_default() += 1;
            }
        }

        Ok(names
            .into_iter()
            .enumerate()
            .map(|(id, name)| (name, per_reference.get(&id).copied().unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    use noodles::csi::binning_index::Indexer;
    use noodles::csi::binning_index::index::reference_sequence::bin::Chunk;
    use noodles::sam::alignment::io::Write as _;
    use noodles::sam::alignment::record::Flags;
    use noodles::sam::alignment::record::cigar::{Op, op::Kind};
    use noodles::sam::alignment::RecordBuf;
    use noodles::sam::header::record::value::{Map, map::ReferenceSequence};
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::TempDir;

    use nbhd_core::models::{ChromosomeOrder, GenomicInterval, RegionTable};

    use crate::backends::count_alignment;
    use crate::totals::alignment_total;

    /// A 50-base read starting at 1-based `start`.
    fn read_at(reference_sequence_id: usize, start: usize, flags: Flags) -> RecordBuf {
        RecordBuf::builder()
            .set_reference_sequence_id(reference_sequence_id)
            .set_flags(flags)
            .set_alignment_start(Position::try_from(start).unwrap())
            .set_cigar([Op::new(Kind::Match, 50)].into_iter().collect())
            .build()
    }

    fn reference(length: usize) -> Map<ReferenceSequence> {
        Map::<ReferenceSequence>::new(NonZeroUsize::try_from(length).unwrap())
    }

    fn build_bai(path: &Path) -> bam::bai::Index {
        let mut reader = bam::io::reader::Builder::default()
            .build_from_path(path)
            .unwrap();
        let header = reader.read_header().unwrap();

        let mut indexer = Indexer::default();
        let mut chunk_start = reader.get_ref().virtual_position();
        let mut record = bam::Record::default();
        while reader.read_record(&mut record).unwrap() != 0 {
            let chunk_end = reader.get_ref().virtual_position();
            let context = match (
                record.reference_sequence_id().transpose().unwrap(),
                record.alignment_start().transpose().unwrap(),
                SamRecord::alignment_end(&record).transpose().unwrap(),
            ) {
                (Some(id), Some(start), Some(end)) => {
                    Some((id, start, end, !record.flags().is_unmapped()))
                }
                _ => None,
            };
            indexer
                .add_record(context, Chunk::new(chunk_start, chunk_end))
                .unwrap();
            chunk_start = chunk_end;
        }
        indexer.build(header.reference_sequences().len())
    }

    /// Coordinate-sorted `reads.bam` over chr1, chr2 and chrM, with `reads.bam.bai`.
    #[fixture]
    fn indexed_bam() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.bam");

        let header = noodles::sam::Header::builder()
            .add_reference_sequence("chr1", reference(10_000))
            .add_reference_sequence("chr2", reference(10_000))
            .add_reference_sequence("chrM", reference(16_569))
            .build();
        let records = [
            read_at(0, 101, Flags::default()),
            read_at(0, 181, Flags::default()),
            read_at(0, 1001, Flags::default()),
            read_at(0, 1101, Flags::UNMAPPED),
            read_at(1, 501, Flags::default()),
            read_at(2, 11, Flags::default()),
        ];

        let mut writer = bam::io::Writer::new(File::create(&path).unwrap());
        writer.write_header(&header).unwrap();
        for record in &records {
            writer.write_alignment_record(&header, record).unwrap();
        }
        writer.try_finish().unwrap();
        drop(writer);

        bam::bai::write(dir.path().join("reads.bam.bai"), &build_bai(&path)).unwrap();
        (dir, path)
    }

    fn regions() -> Vec<RegionKey> {
        vec![
            RegionKey::new("chr1", 120, 200),
            RegionKey::new("chr1", 1000, 1200),
            RegionKey::new("chr2", 500, 500),
            RegionKey::new("chr3", 0, 100),
            RegionKey::new("chr1", 150, 180),
        ]
    }

    fn genome() -> ChromSizes {
        ChromSizes::from_entries(vec![("chr1", 10_000), ("chr2", 10_000)])
    }

    #[rstest]
    fn test_header_order(indexed_bam: (TempDir, PathBuf)) {
        let (_dir, path) = indexed_bam;
        assert_eq!(
            NoodlesBam.header_order(&path).unwrap(),
            vec!["chr1", "chr2", "chrM"]
        );
    }

    #[rstest]
    fn test_sorted_coverage_queries_index(indexed_bam: (TempDir, PathBuf)) {
        let (_dir, path) = indexed_bam;
        let run = NoodlesBam.sorted_coverage(&path, &regions(), &genome(), Deadline::none());
        assert!(!run.is_failed(), "{}", run.diagnostic);
        assert_eq!(run.counts, vec![2.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[rstest]
    fn test_unsorted_coverage_matches_sorted(indexed_bam: (TempDir, PathBuf)) {
        let (_dir, path) = indexed_bam;
        let run = NoodlesBam.unsorted_coverage(&path, &regions(), &genome(), Deadline::none());
        assert!(!run.is_failed(), "{}", run.diagnostic);
        assert_eq!(run.counts, vec![2.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[rstest]
    fn test_expired_deadline_fails_run(indexed_bam: (TempDir, PathBuf)) {
        let (_dir, path) = indexed_bam;
        let deadline = Deadline::after(Some(std::time::Duration::ZERO));
        let run = NoodlesBam.sorted_coverage(&path, &regions(), &genome(), deadline);
        assert_eq!(run.exit_code, TIMEOUT_EXIT_CODE);
        assert!(run.is_failed());
    }

    #[rstest]
    fn test_missing_index_fails_sorted_path(indexed_bam: (TempDir, PathBuf)) {
        let (dir, path) = indexed_bam;
        std::fs::remove_file(dir.path().join("reads.bam.bai")).unwrap();
        let run = NoodlesBam.sorted_coverage(&path, &regions(), &genome(), Deadline::none());
        assert!(run.is_failed());

        let run = NoodlesBam.unsorted_coverage(&path, &regions(), &genome(), Deadline::none());
        assert_eq!(run.counts, vec![2.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[rstest]
    fn test_mapped_counts_from_index(indexed_bam: (TempDir, PathBuf)) {
        let (_dir, path) = indexed_bam;
        let expected = vec![
            ("chr1".to_string(), 3),
            ("chr2".to_string(), 1),
            ("chrM".to_string(), 1),
        ];
        assert_eq!(NoodlesBam.mapped_read_counts(&path).unwrap(), expected);

        let nuclear = ChromosomeOrder::new(["chr1", "chr2"]);
        assert_eq!(alignment_total(&NoodlesBam, &path, &nuclear).unwrap(), 4.0);
    }

    #[rstest]
    fn test_mapped_counts_without_index(indexed_bam: (TempDir, PathBuf)) {
        let (dir, path) = indexed_bam;
        std::fs::remove_file(dir.path().join("reads.bam.bai")).unwrap();
        let expected = vec![
            ("chr1".to_string(), 3),
            ("chr2".to_string(), 1),
            ("chrM".to_string(), 1),
        ];
        assert_eq!(NoodlesBam.mapped_read_counts(&path).unwrap(), expected);
    }

    #[rstest]
    fn test_count_alignment_on_bam(indexed_bam: (TempDir, PathBuf)) {
        let (_dir, path) = indexed_bam;
        let table = RegionTable::new(
            vec![
                GenomicInterval::new("chr2", 500, 500),
                GenomicInterval::new("chr1", 120, 200),
                GenomicInterval::new("chr1", 1000, 1200),
            ],
            vec![],
        );
        let counts = count_alignment(
            &NoodlesBam,
            &path,
            &table,
            &genome(),
            &ChromosomeOrder::human(),
            Deadline::none(),
        )
        .unwrap();
        assert_eq!(counts, vec![1.0, 2.0, 1.0]);
    }
}
