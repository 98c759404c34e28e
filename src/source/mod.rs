//! Dataset sources.
//!
//! A `WasteSource` produces one immutable `WasteDataset`. Callers load once per
//! session and pass the snapshot to every aggregation call.

use tracing::debug;

use crate::constants::source::IN_MEMORY_SOURCE_ID;
use crate::data::{WasteDataset, WasteRecord};
use crate::errors::WasteError;
use crate::types::SourceId;

/// CSV file source.
pub mod csv_source;
/// Collection date parsing.
pub mod date_helpers;

pub use csv_source::{CsvFileSource, read_records};

/// Producer of a complete, validated dataset snapshot.
pub trait WasteSource: Send + Sync {
    /// Stable source identifier used in logs and errors.
    fn id(&self) -> &str;
    /// Load every record. Malformed input fails the whole load.
    fn load(&self) -> Result<WasteDataset, WasteError>;
}

/// Source backed by records already in memory.
#[derive(Clone, Debug)]
pub struct InMemorySource {
    source_id: SourceId,
    records: Vec<WasteRecord>,
}

impl InMemorySource {
    /// Create a source holding `records`.
    pub fn new(records: Vec<WasteRecord>) -> Self {
        Self {
            source_id: IN_MEMORY_SOURCE_ID.to_string(),
            records,
        }
    }

    /// Override the source id.
    pub fn with_source_id(mut self, source_id: impl Into<SourceId>) -> Self {
        self.source_id = source_id.into();
        self
    }
}

impl WasteSource for InMemorySource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn load(&self) -> Result<WasteDataset, WasteError> {
        debug!(
            source = %self.source_id,
            records = self.records.len(),
            "snapshotting in-memory records"
        );
        Ok(WasteDataset::new(self.records.clone()))
    }
}
