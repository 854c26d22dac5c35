use std::path::PathBuf;

use thiserror::Error;

use nbhd_core::RegionTableError;
use nbhd_coverage::CoverageError;

#[derive(Error, Debug)]
pub enum QuantError {
    #[error(transparent)]
    Coverage(#[from] CoverageError),

    #[error(transparent)]
    Table(#[from] RegionTableError),

    #[error(
        "Merging counts for feature {feature} from {track} changed the row count from {expected} to {found}"
    )]
    RowCountChanged {
        feature: String,
        track: String,
        expected: usize,
        found: usize,
    },

    #[error("Malformed count file {path}:{line}: {msg}")]
    CacheParse {
        path: PathBuf,
        line: usize,
        msg: String,
    },

    #[error("Invalid feature specification {0:?}. Expected `label=track[,track...]`")]
    BadFeatureSpec(String),

    #[error("Feature {0} has no tracks")]
    EmptyFeature(String),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuantError>;
