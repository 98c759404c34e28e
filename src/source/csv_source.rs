use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::source::CSV_SOURCE_PREFIX;
use crate::data::{WasteDataset, WasteRecord};
use crate::errors::WasteError;
use crate::source::WasteSource;
use crate::source::date_helpers::parse_collection_date;
use crate::types::SourceId;

/// One CSV row before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Building")]
    building: String,
    #[serde(rename = "Stream")]
    stream: String,
    #[serde(rename = "Substream", default)]
    substream: Option<String>,
    #[serde(rename = "Weight")]
    weight: String,
}

/// Waste dataset stored as a CSV file with a `Date,Building,Stream,Substream,Weight` header.
#[derive(Clone, Debug)]
pub struct CsvFileSource {
    source_id: SourceId,
    path: PathBuf,
}

impl CsvFileSource {
    /// Create a source reading `path`; the id is derived from the file name.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            source_id: format!("{CSV_SOURCE_PREFIX}{name}"),
            path,
        }
    }

    /// Override the source id.
    pub fn with_source_id(mut self, source_id: impl Into<SourceId>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Path this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WasteSource for CsvFileSource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn load(&self) -> Result<WasteDataset, WasteError> {
        let file = File::open(&self.path).map_err(|err| WasteError::SourceUnavailable {
            source_id: self.source_id.clone(),
            reason: format!("{}: {err}", self.path.display()),
        })?;
        let records = read_records(file)?;
        info!(
            source = %self.source_id,
            records = records.len(),
            "loaded waste dataset"
        );
        Ok(WasteDataset::new(records))
    }
}

/// Read and validate every row from CSV `reader`.
///
/// Fails on the first malformed row; line numbers count the header as line 1.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<WasteRecord>, WasteError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    debug!(columns = ?headers, "reading waste csv");
    let mut row = StringRecord::new();
    let mut records = Vec::new();
    while reader.read_record(&mut row)? {
        let line = row.position().map_or(0, |position| position.line());
        let raw: RawRow = row
            .deserialize(Some(&headers))
            .map_err(|err| WasteError::InvalidRow {
                line,
                reason: err.to_string(),
            })?;
        records.push(build_record(raw, line)?);
    }
    Ok(records)
}

fn build_record(raw: RawRow, line: u64) -> Result<WasteRecord, WasteError> {
    let invalid = |reason: String| WasteError::InvalidRow { line, reason };
    let date = parse_collection_date(&raw.date)
        .ok_or_else(|| invalid(format!("unparseable date '{}'", raw.date)))?;
    if raw.building.is_empty() {
        return Err(invalid("missing building".to_string()));
    }
    if raw.stream.is_empty() {
        return Err(invalid("missing stream".to_string()));
    }
    let weight = raw
        .weight
        .parse::<f64>()
        .map_err(|_| invalid(format!("non-numeric weight '{}'", raw.weight)))?;
    WasteRecord::new(
        date,
        raw.building,
        raw.stream,
        raw.substream.unwrap_or_default(),
        weight,
    )
    .map_err(|err| invalid(err.to_string()))
}
