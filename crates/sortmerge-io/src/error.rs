use thiserror::Error;

/// Result type local to sortmerge-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse error at record {record}: {message}")]
    Parse { record: u64, message: String },

    #[error("invalid location: {0}")]
    Location(String),

    #[error("seek rejected: {0}")]
    SeekRejected(String),

    #[error("source is not open: {0}")]
    NotOpen(String),

    #[error("close failed: {0}")]
    Close(String),

    #[error(transparent)]
    Core(#[from] sortmerge_core::error::Error),
}
