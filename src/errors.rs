use thiserror::Error;

use crate::types::SourceId;

/// Error type for dataset loading, geometry parsing, and configuration failures.
#[derive(Debug, Error)]
pub enum WasteError {
    #[error("data source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable { source_id: SourceId, reason: String },
    #[error("invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("building geometry error: {0}")]
    Geometry(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
