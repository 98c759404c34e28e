//! Views composed from the aggregation engine: year/building pickers,
//! scorecards, and chart series.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::aggregation::{
    BuildingTotals, CategoryTotals, CategoryWeights, MisclassificationReport,
    MisclassifiedStreams, MostMisclassified,
};
use crate::classification::StreamLabel;
use crate::data::{Category, WasteDataset};
use crate::geometry::{BuildingRegistry, BuildingShade, choropleth_shades};
use crate::metrics::{percentage, round_weight};
use crate::types::{BuildingName, Pounds, StreamText, Year};

/// Building and its total weight for a year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildingScore {
    /// Building name.
    pub building: BuildingName,
    /// Total weight for the year.
    pub weight: Pounds,
}

/// The three headline numbers shown for a year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scorecards {
    /// Selected year.
    pub year: Year,
    /// Total waste collected in the year.
    pub total_waste: Pounds,
    /// Building with the highest total, `None` for an empty year.
    pub highest_building: Option<BuildingScore>,
    /// Material most often found in the wrong bin.
    pub most_misclassified: MostMisclassified,
}

impl Scorecards {
    /// Compute all scorecards for `year`.
    pub fn for_year(dataset: &WasteDataset, year: Year) -> Self {
        Self {
            year,
            total_waste: dataset.total_waste(year),
            highest_building: dataset.highest_waste_building(year),
            most_misclassified: dataset.most_misclassified_stream(year).winner(),
        }
    }
}

/// One slice of a donut chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DonutSlice {
    /// Category the slice represents.
    pub category: Category,
    /// Slice weight.
    pub weight: Pounds,
    /// Share of the chart total, 0-100.
    pub percent: f64,
}

/// Turn per-category weights into donut slices in canonical order.
pub fn donut_slices(weights: &CategoryWeights) -> Vec<DonutSlice> {
    let total = weights.sum();
    weights
        .iter()
        .map(|(category, weight)| DonutSlice {
            category,
            weight,
            percent: round_weight(percentage(weight, total)),
        })
        .collect()
}

/// Misclassified weight by building and raw stream label.
///
/// Feeds the stacked-area and line charts. Both axes are sorted.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MisclassificationSeries {
    series: BTreeMap<BuildingName, BTreeMap<StreamText, Pounds>>,
}

impl MisclassificationSeries {
    /// Buildings with at least one non-pure stream record.
    pub fn buildings(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    /// Every stream label appearing for any building.
    pub fn streams(&self) -> BTreeSet<&str> {
        self.series
            .values()
            .flat_map(|streams| streams.keys().map(String::as_str))
            .collect()
    }

    /// Weight for a `(building, stream)` cell, `None` when the cell is empty.
    pub fn get(&self, building: &str, stream: &str) -> Option<Pounds> {
        self.series.get(building)?.get(stream).copied()
    }

    /// True when nothing was misclassified.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Charts for one selected building.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildingReport {
    /// Selected building.
    pub building: BuildingName,
    /// Pure-stream weights for the correct classification donut.
    pub correct: CategoryWeights,
    /// Containment-attributed weights for the misclassification donut.
    pub misclassified: CategoryWeights,
}

/// Everything the dashboard shows for one year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YearReport {
    /// Headline numbers.
    pub scorecards: Scorecards,
    /// Correctly classified totals.
    pub category_totals: CategoryTotals,
    /// Containment-attributed misclassified totals.
    pub misclassified: MisclassificationReport,
    /// `"X in Y"` based misclassification per material.
    pub misclassified_streams: MisclassifiedStreams,
    /// Per-building totals.
    pub building_totals: BuildingTotals,
    /// Stacked-area series.
    pub misclassification_series: MisclassificationSeries,
    /// Selected building charts, when a building is in scope.
    pub building: Option<BuildingReport>,
    /// Map shades, when a registry is available.
    pub shades: Option<Vec<BuildingShade>>,
}

impl YearReport {
    /// Build the report for `year`.
    ///
    /// Without an explicit `building`, the first building with records in the
    /// year is selected, matching the building picker default.
    pub fn build(
        dataset: &WasteDataset,
        year: Year,
        building: Option<&str>,
        registry: Option<&BuildingRegistry>,
    ) -> Self {
        let building_totals = dataset.building_totals(year);
        let selected = building.map(str::to_string).or_else(|| {
            dataset
                .available_buildings(year)
                .first()
                .map(|first| first.to_string())
        });
        let building = selected.map(|name| BuildingReport {
            correct: dataset.correct_classification_for_building(year, &name),
            misclassified: dataset.misclassified_weight_for_building(year, &name),
            building: name,
        });
        Self {
            scorecards: Scorecards::for_year(dataset, year),
            category_totals: dataset.category_totals(year),
            misclassified: dataset.misclassified_weight(year),
            misclassified_streams: dataset.most_misclassified_stream(year),
            misclassification_series: dataset.misclassification_by_building(year),
            shades: registry.map(|registry| choropleth_shades(registry, &building_totals)),
            building,
            building_totals,
        }
    }
}

impl WasteDataset {
    /// Distinct years, heaviest first; equal totals keep first-appearance order.
    pub fn available_years(&self) -> Vec<Year> {
        let mut totals: IndexMap<Year, Pounds> = IndexMap::new();
        for record in self.records() {
            *totals.entry(record.year()).or_insert(0.0) += record.weight();
        }
        let mut years: Vec<(Year, Pounds)> = totals.into_iter().collect();
        years.sort_by(|a, b| b.1.total_cmp(&a.1));
        years.into_iter().map(|(year, _)| year).collect()
    }

    /// Distinct buildings with records in `year`, in first-appearance order.
    pub fn available_buildings(&self, year: Year) -> Vec<&str> {
        let buildings: IndexSet<&str> = self
            .in_year(year)
            .map(|record| record.building())
            .collect();
        buildings.into_iter().collect()
    }

    /// Building with the highest total weight in `year`.
    pub fn highest_waste_building(&self, year: Year) -> Option<BuildingScore> {
        self.building_totals(year)
            .highest()
            .map(|(building, weight)| BuildingScore {
                building: building.to_string(),
                weight,
            })
    }

    /// Weight of pure-labelled streams for one building, for the correct
    /// classification donut. Substreams are not consulted here.
    pub fn correct_classification_for_building(
        &self,
        year: Year,
        building: &str,
    ) -> CategoryWeights {
        let mut weights = CategoryWeights::default();
        for record in self.in_year_for_building(year, building) {
            if let StreamLabel::Correct(category) = record.label() {
                weights.add(category, record.weight());
            }
        }
        weights.rounded()
    }

    /// Weight of every non-pure stream in `year`, by building and stream label.
    ///
    /// Unrecognized labels are included; only pure category labels are left out.
    pub fn misclassification_by_building(&self, year: Year) -> MisclassificationSeries {
        let mut series: BTreeMap<BuildingName, BTreeMap<StreamText, Pounds>> = BTreeMap::new();
        for record in self.in_year(year) {
            if record.label().is_correct() {
                continue;
            }
            *series
                .entry(record.building().to_string())
                .or_default()
                .entry(record.stream().to_string())
                .or_insert(0.0) += record.weight();
        }
        for streams in series.values_mut() {
            for weight in streams.values_mut() {
                *weight = round_weight(*weight);
            }
        }
        MisclassificationSeries { series }
    }
}
