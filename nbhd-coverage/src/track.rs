use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use nbhd_core::utils::file_basename;

use crate::errors::{CoverageError, Result};

/// The kind of signal source a track file holds, decided by its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    /// Sorted, indexed `.bam` alignments.
    Alignment,
    /// bgzipped `.tagAlign.gz` / `.tagAlign.bgz` read intervals.
    TagInterval,
    /// Continuous `.bw` / `.bigWig` / `.bigwig` signal.
    SignalTrack,
}

impl TrackKind {
    ///
    /// Classify a track by its suffix. Unknown suffixes are an error, never a guess.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = file_basename(path);
        if name.ends_with(".bam") {
            Ok(TrackKind::Alignment)
        } else if name.ends_with(".tagAlign.gz") || name.ends_with(".tagAlign.bgz") {
            Ok(TrackKind::TagInterval)
        } else if name.ends_with(".bw") || name.ends_with(".bigWig") || name.ends_with(".bigwig")
        {
            Ok(TrackKind::SignalTrack)
        } else {
            Err(CoverageError::UnsupportedFormat(path.to_path_buf()))
        }
    }
}

impl Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackKind::Alignment => "alignment",
            TrackKind::TagInterval => "tagAlign",
            TrackKind::SignalTrack => "bigWig",
        };
        write!(f, "{}", s)
    }
}

///
/// A reference to an external signal source. Immutable once constructed.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureTrack {
    path: PathBuf,
    kind: TrackKind,
}

impl FeatureTrack {
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let kind = TrackKind::from_path(&path)?;
        Ok(FeatureTrack { path, kind })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    /// File name of the track, used in column names and cache keys.
    pub fn basename(&self) -> String {
        file_basename(&self.path)
    }
}

impl Display for FeatureTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("/data/H3K27ac.rep1.bam", TrackKind::Alignment)]
    #[case("dnase.tagAlign.gz", TrackKind::TagInterval)]
    #[case("dnase.tagAlign.bgz", TrackKind::TagInterval)]
    #[case("proseq.minus.bw", TrackKind::SignalTrack)]
    #[case("atac.bigWig", TrackKind::SignalTrack)]
    #[case("atac.bigwig", TrackKind::SignalTrack)]
    fn test_dispatch_by_suffix(#[case] path: &str, #[case] expected: TrackKind) {
        assert_eq!(TrackKind::from_path(Path::new(path)).unwrap(), expected);
    }

    #[rstest]
    #[case("reads.sam")]
    #[case("reads.bam.bai")]
    #[case("peaks.bed.gz")]
    #[case("dnase.tagAlign")]
    fn test_unsupported_suffix(#[case] path: &str) {
        assert!(matches!(
            FeatureTrack::new(path),
            Err(CoverageError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_basename() {
        let track = FeatureTrack::new("/data/tracks/H3K27ac.rep1.bam").unwrap();
        assert_eq!(track.basename(), "H3K27ac.rep1.bam");
        assert_eq!(track.kind(), TrackKind::Alignment);
    }
}
