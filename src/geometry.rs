//! Building-geometry registry and choropleth shading.
//!
//! Only building names are read from the GeoJSON; boundaries stay with the
//! map renderer. Registry buildings without records shade as "No Data".

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::aggregation::{BuildingTotals, BuildingWeight};
use crate::constants::geometry::{BUILDING_PROPERTY, SKIP_UNNAMED_FEATURE_MSG};
use crate::errors::WasteError;
use crate::types::BuildingName;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// Building names known to the map, in feature order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildingRegistry {
    buildings: IndexSet<BuildingName>,
}

impl BuildingRegistry {
    /// Build a registry from explicit names; duplicates are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BuildingName>,
    {
        Self {
            buildings: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a GeoJSON `FeatureCollection`, keyed by `properties.Building`.
    ///
    /// Features without a string building name are skipped with a warning.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, WasteError> {
        let collection: FeatureCollection = serde_json::from_reader(reader)?;
        let mut buildings = IndexSet::new();
        for (idx, feature) in collection.features.into_iter().enumerate() {
            let name = feature
                .properties
                .as_ref()
                .and_then(|properties| properties.get(BUILDING_PROPERTY))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty());
            match name {
                Some(name) => {
                    buildings.insert(name.to_string());
                }
                None => warn!(feature = idx, "{}", SKIP_UNNAMED_FEATURE_MSG),
            }
        }
        Ok(Self { buildings })
    }

    /// Read a GeoJSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WasteError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            WasteError::Geometry(format!("cannot open {}: {err}", path.display()))
        })?;
        let registry = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            buildings = registry.len(),
            "loaded building geometry"
        );
        Ok(registry)
    }

    /// Whether `building` has a boundary on the map.
    pub fn contains(&self, building: &str) -> bool {
        self.buildings.contains(building)
    }

    /// Building names in feature order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.buildings.iter().map(String::as_str)
    }

    /// Number of buildings.
    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    /// True when no building was registered.
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }
}

/// Fill value and tooltip for one map building.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildingShade {
    /// Building name from the registry.
    pub building: BuildingName,
    /// Tooltip weight: `"12.5 lbs"` or `"No Data"`.
    #[serde(serialize_with = "serialize_display")]
    pub weight: BuildingWeight,
    /// Weight relative to the heaviest building (0-1), `None` for "No Data".
    pub intensity: Option<f64>,
}

/// Shade every registry building from the year's totals.
///
/// Totals for buildings missing from the registry are not drawn.
pub fn choropleth_shades(
    registry: &BuildingRegistry,
    totals: &BuildingTotals,
) -> Vec<BuildingShade> {
    let max = totals
        .iter()
        .map(|(_, weight)| weight)
        .fold(0.0_f64, f64::max);
    registry
        .iter()
        .map(|building| {
            let weight = totals.get(building);
            let intensity = weight
                .pounds()
                .map(|pounds| if max > 0.0 { pounds / max } else { 0.0 });
            BuildingShade {
                building: building.to_string(),
                weight,
                intensity,
            }
        })
        .collect()
}

/// Buildings with records in the year that the map cannot draw.
pub fn unmapped_buildings<'a>(
    registry: &BuildingRegistry,
    totals: &'a BuildingTotals,
) -> Vec<&'a str> {
    totals
        .iter()
        .map(|(building, _)| building)
        .filter(|building| !registry.contains(building))
        .collect()
}

fn serialize_display<S: serde::Serializer>(
    value: &BuildingWeight,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
