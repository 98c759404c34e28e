#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Year-scoped aggregation engine and its result types.
pub mod aggregation;
/// Stream label parsing and classification rules.
pub mod classification;
/// Dashboard configuration and path resolution.
pub mod config;
/// Centralized constants for labels, columns, and defaults.
pub mod constants;
/// Dashboard views: pickers, scorecards, chart series.
pub mod dashboard;
/// Waste categories, records, and dataset snapshots.
pub mod data;
/// Reusable CLI runners shared by the demo binaries.
pub mod example_apps;
/// Building-geometry registry and choropleth shading.
pub mod geometry;
/// Rounding and formatting helpers for weights.
pub mod metrics;
/// Dataset sources (CSV, in-memory).
pub mod source;
/// Shared type aliases.
pub mod types;

mod errors;

pub use aggregation::{
    BuildingTotals, BuildingWeight, CategoryTotals, CategoryWeights, MisclassificationReport,
    MisclassifiedStreams, MostMisclassified,
};
pub use classification::{CategoryMentions, StreamLabel};
pub use config::DashboardConfig;
pub use dashboard::{
    BuildingReport, BuildingScore, MisclassificationSeries, Scorecards, YearReport,
};
pub use data::{Category, WasteDataset, WasteRecord};
pub use errors::WasteError;
pub use geometry::{BuildingRegistry, BuildingShade};
pub use source::{CsvFileSource, InMemorySource, WasteSource};
pub use types::{BuildingName, Pounds, SourceId, StreamText, Year};
