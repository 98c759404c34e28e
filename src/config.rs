use std::env;
use std::path::PathBuf;

use crate::constants::config::{DATA_PATH_ENV, DEFAULT_DATA_FILENAME, GEOMETRY_PATH_ENV};
use crate::data::WasteDataset;
use crate::errors::WasteError;
use crate::geometry::BuildingRegistry;
use crate::source::{CsvFileSource, WasteSource};

/// Locations of the dashboard inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    /// CSV dataset path.
    pub data_path: PathBuf,
    /// Optional GeoJSON building registry; without it no map shades are produced.
    pub geometry_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILENAME),
            geometry_path: None,
        }
    }
}

impl DashboardConfig {
    /// Resolve paths in order: explicit argument, environment variable, default.
    ///
    /// Reads `WASTE_DATA_PATH` and `WASTE_GEOMETRY_PATH`; empty values count as unset.
    pub fn resolve(data_path: Option<PathBuf>, geometry_path: Option<PathBuf>) -> Self {
        Self::resolve_with(data_path, geometry_path, |key| env::var(key).ok())
    }

    fn resolve_with<F>(
        data_path: Option<PathBuf>,
        geometry_path: Option<PathBuf>,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };
        let defaults = Self::default();
        Self {
            data_path: data_path
                .or_else(|| from_env(DATA_PATH_ENV))
                .unwrap_or(defaults.data_path),
            geometry_path: geometry_path
                .or_else(|| from_env(GEOMETRY_PATH_ENV))
                .or(defaults.geometry_path),
        }
    }

    /// Override the dataset path.
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Set the building registry path.
    pub fn with_geometry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.geometry_path = Some(path.into());
        self
    }

    /// Reject configurations that cannot name a dataset.
    pub fn validate(&self) -> Result<(), WasteError> {
        if self.data_path.as_os_str().is_empty() {
            return Err(WasteError::Configuration(
                "data path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// CSV source for the configured dataset.
    pub fn source(&self) -> CsvFileSource {
        CsvFileSource::new(&self.data_path)
    }

    /// Validate and load the dataset snapshot.
    pub fn load_dataset(&self) -> Result<WasteDataset, WasteError> {
        self.validate()?;
        self.source().load()
    }

    /// Load the building registry when a geometry path is configured.
    pub fn load_registry(&self) -> Result<Option<BuildingRegistry>, WasteError> {
        self.geometry_path
            .as_ref()
            .map(BuildingRegistry::load)
            .transpose()
    }
}
