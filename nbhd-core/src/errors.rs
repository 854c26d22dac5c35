use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegionTableError {
    #[error("Can't read file: {0}")]
    FileReadError(PathBuf),

    #[error("Error parsing region at {path}:{line}: {msg}")]
    RegionParseError {
        path: PathBuf,
        line: usize,
        msg: String,
    },

    #[error("Error parsing chromosome sizes at {path}:{line}: {msg}")]
    ChromSizesParseError {
        path: PathBuf,
        line: usize,
        msg: String,
    },

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Column {name} has {found} values but the table has {expected} rows")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Column {0} does not hold numeric values")]
    NotNumeric(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegionTableError>;
