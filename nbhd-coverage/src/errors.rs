use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Unsupported track format: {0}. Expected .bam, .tagAlign.gz, .tagAlign.bgz, .bw, .bigWig or .bigwig")]
    UnsupportedFormat(PathBuf),

    #[error("Counting failed for {track}:\n{diagnostic}")]
    BackendFailed { track: PathBuf, diagnostic: String },

    #[error("Signal query failed on {chr}:{start}-{end} in {track}: {msg}")]
    SignalQuery {
        track: PathBuf,
        chr: String,
        start: u32,
        end: u32,
        msg: String,
    },

    #[error("Total signal for {track} is {total}; cannot normalise by it")]
    ZeroTotal { track: PathBuf, total: f64 },

    #[error("Timed out while counting {0}")]
    Timeout(PathBuf),

    #[error("Can't read alignment file {path}: {msg}")]
    Alignment { path: PathBuf, msg: String },

    #[error("Can't read signal track {path}: {msg}")]
    Signal { path: PathBuf, msg: String },

    #[error("Can't query tag index {path}: {msg}")]
    TagIndex { path: PathBuf, msg: String },

    #[error("Malformed record at {path}:{line}: {msg}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        msg: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoverageError>;
