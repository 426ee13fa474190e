use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrossError {
    #[error("Column '{column}' not found in {table} table")]
    MissingColumn { column: String, table: String },

    #[error("Invalid join mode '{mode}'. Valid modes: inner, left, right, outer")]
    InvalidJoinMode { mode: String },

    #[error("Invalid suffixes: {0}")]
    InvalidSuffixes(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Column '{column}' has {found} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Dataset already registered: {0}")]
    DuplicateDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl From<polars::error::PolarsError> for CrossError {
    fn from(err: polars::error::PolarsError) -> Self {
        CrossError::Polars(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CrossError>;
