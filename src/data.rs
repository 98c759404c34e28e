use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::classification::{CategoryMentions, StreamLabel};
use crate::constants::category::{COMPOST, LANDFILL, RECYCLE_ALIAS, RECYCLING};
use crate::errors::WasteError;

use crate::types::{BuildingName, Pounds, StreamText, Year};

/// Closed set of waste categories; each is both a material type and a bin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Trash headed for landfill.
    Landfill,
    /// Recyclable material.
    Recycling,
    /// Compostable material.
    Compost,
}

impl Category {
    /// Canonical enumeration order (`Landfill, Recycling, Compost`).
    pub const ALL: [Category; 3] = [Category::Landfill, Category::Recycling, Category::Compost];

    /// Canonical label as written in stream text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Landfill => LANDFILL,
            Category::Recycling => RECYCLING,
            Category::Compost => COMPOST,
        }
    }

    /// Parse a canonical category name. `Recycle` is not accepted here.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            LANDFILL => Some(Category::Landfill),
            RECYCLING => Some(Category::Recycling),
            COMPOST => Some(Category::Compost),
            _ => None,
        }
    }

    /// Parse a pure, correctly sorted stream label, accepting `Recycle`.
    pub fn from_correct_label(label: &str) -> Option<Self> {
        match label {
            RECYCLE_ALIAS => Some(Category::Recycling),
            other => Self::from_name(other),
        }
    }

    /// The two categories other than `self`, in canonical order.
    pub fn others(self) -> [Category; 2] {
        match self {
            Category::Landfill => [Category::Recycling, Category::Compost],
            Category::Recycling => [Category::Landfill, Category::Compost],
            Category::Compost => [Category::Landfill, Category::Recycling],
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Category::Landfill => 0,
            Category::Recycling => 1,
            Category::Compost => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the waste audit.
///
/// The stream label is parsed when the record is built, so aggregation never
/// re-reads the raw text.
#[derive(Clone, Debug, PartialEq)]
pub struct WasteRecord {
    date: NaiveDate,
    building: BuildingName,
    stream: StreamText,
    substream: String,
    weight: Pounds,
    label: StreamLabel,
    mentions: CategoryMentions,
}

impl WasteRecord {
    /// Build a record, rejecting negative or non-finite weights.
    pub fn new(
        date: NaiveDate,
        building: impl Into<BuildingName>,
        stream: impl Into<StreamText>,
        substream: impl Into<String>,
        weight: Pounds,
    ) -> Result<Self, WasteError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(WasteError::InvalidRecord(format!(
                "weight must be a non-negative number, got {weight}"
            )));
        }
        let stream = stream.into();
        let label = StreamLabel::parse(&stream);
        let mentions = CategoryMentions::scan(&stream);
        Ok(Self {
            date,
            building: building.into(),
            stream,
            substream: substream.into(),
            weight,
            label,
            mentions,
        })
    }

    /// Collection date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Calendar year of the collection date.
    pub fn year(&self) -> Year {
        self.date.year()
    }

    pub fn building(&self) -> &str {
        &self.building
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn substream(&self) -> &str {
        &self.substream
    }

    /// Measured weight in pounds.
    pub fn weight(&self) -> Pounds {
        self.weight
    }

    /// Parsed stream label.
    pub fn label(&self) -> StreamLabel {
        self.label
    }

    /// Category names mentioned anywhere in the raw stream text.
    pub fn mentions(&self) -> CategoryMentions {
        self.mentions
    }
}

/// Immutable, cheaply cloneable snapshot of loaded records.
///
/// Every aggregation reads from one snapshot, so all views of a session agree.
#[derive(Clone, Debug)]
pub struct WasteDataset {
    records: Arc<[WasteRecord]>,
}

impl WasteDataset {
    pub fn new(records: Vec<WasteRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[WasteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records collected during `year`.
    pub fn in_year(&self, year: Year) -> impl Iterator<Item = &WasteRecord> + '_ {
        self.records
            .iter()
            .filter(move |record| record.year() == year)
    }

    /// Records collected during `year` for exactly `building`.
    pub fn in_year_for_building<'a>(
        &'a self,
        year: Year,
        building: &'a str,
    ) -> impl Iterator<Item = &'a WasteRecord> + 'a {
        self.in_year(year)
            .filter(move |record| record.building() == building)
    }
}

impl Default for WasteDataset {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FromIterator<WasteRecord> for WasteDataset {
    fn from_iter<I: IntoIterator<Item = WasteRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
