use thiserror::Error;

use nbhd_core::RegionTableError;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error(transparent)]
    Table(#[from] RegionTableError),

    #[error("Gene table has no `{0}` field to take gene symbols from")]
    MissingSymbolField(String),

    #[error("Malformed gene symbol list for {region}")]
    MalformedSymbol { region: String },

    #[error("Unknown region class: {0}")]
    UnknownClass(String),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
