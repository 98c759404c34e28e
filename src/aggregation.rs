//! Year-scoped aggregation over a loaded `WasteDataset`.
//!
//! Every operation is a pure scan of the snapshot. Empty scopes produce
//! zero-valued aggregates rather than errors, and user-facing weights are
//! rounded to two decimal places.

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::classification::{StreamLabel, containment_attribution, correct_category};
use crate::constants::report::{
    MOST_MISCLASSIFIED_KEY, NO_DATA, TOTAL_MISCLASSIFIED_KEY, TOTAL_WASTE_KEY,
};
use crate::data::{Category, WasteDataset, WasteRecord};
use crate::metrics::{format_pounds, round_weight};
use crate::types::{BuildingName, Pounds, Year};

/// Iteration order used to pick the most misclassified stream.
///
/// The first category reaching the maximum wins, so this order decides ties.
pub const MOST_MISCLASSIFIED_ORDER: [Category; 3] =
    [Category::Compost, Category::Landfill, Category::Recycling];

/// One weight per category; every category is always present.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CategoryWeights {
    weights: [Pounds; 3],
}

impl CategoryWeights {
    /// Weight recorded for `category` (0 when nothing contributed).
    pub fn get(&self, category: Category) -> Pounds {
        self.weights[category.index()]
    }

    /// Add `weight` to `category`.
    pub fn add(&mut self, category: Category, weight: Pounds) {
        self.weights[category.index()] += weight;
    }

    /// Landfill + Recycling + Compost, summed in that order.
    pub fn sum(&self) -> Pounds {
        Category::ALL
            .iter()
            .map(|category| self.get(*category))
            .sum()
    }

    /// `(category, weight)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, Pounds)> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// First category holding the maximum weight when scanned in `order`.
    pub fn largest_in(&self, order: &[Category; 3]) -> (Category, Pounds) {
        let mut best = (order[0], self.get(order[0]));
        for category in &order[1..] {
            let weight = self.get(*category);
            if weight > best.1 {
                best = (*category, weight);
            }
        }
        best
    }

    pub(crate) fn rounded(self) -> Self {
        Self {
            weights: self.weights.map(round_weight),
        }
    }
}

impl Index<Category> for CategoryWeights {
    type Output = Pounds;

    fn index(&self, category: Category) -> &Pounds {
        &self.weights[category.index()]
    }
}

impl Serialize for CategoryWeights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        for (category, weight) in self.iter() {
            map.serialize_entry(category.as_str(), &weight)?;
        }
        map.end()
    }
}

/// Correctly classified weight per category for one year.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CategoryTotals {
    weights: CategoryWeights,
    total_waste: Pounds,
}

impl CategoryTotals {
    /// Correct weight for `category`.
    pub fn get(&self, category: Category) -> Pounds {
        self.weights.get(category)
    }

    /// Per-category weights.
    pub fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    /// Sum of the three category totals.
    ///
    /// Misclassified and unrecognized records are excluded, so this is not the
    /// same quantity as `WasteDataset::total_waste`.
    pub fn total_waste(&self) -> Pounds {
        self.total_waste
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for (category, weight) in self.weights.iter() {
            map.serialize_entry(category.as_str(), &weight)?;
        }
        map.serialize_entry(TOTAL_WASTE_KEY, &self.total_waste)?;
        map.end()
    }
}

/// Misclassified weight attributed by the containment rules for one year.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MisclassificationReport {
    weights: CategoryWeights,
    total_misclassified: Pounds,
}

impl MisclassificationReport {
    /// Misclassified weight attributed to `category`.
    pub fn get(&self, category: Category) -> Pounds {
        self.weights.get(category)
    }

    /// Per-category weights.
    pub fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    /// Running total over every attributed record.
    pub fn total_misclassified(&self) -> Pounds {
        self.total_misclassified
    }

    /// Category with the largest attributed weight, ties to canonical order.
    pub fn largest(&self) -> (Category, Pounds) {
        self.weights.largest_in(&Category::ALL)
    }
}

impl Serialize for MisclassificationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for (category, weight) in self.weights.iter() {
            map.serialize_entry(category.as_str(), &weight)?;
        }
        map.serialize_entry(TOTAL_MISCLASSIFIED_KEY, &self.total_misclassified)?;
        map.end()
    }
}

/// The single most misclassified material for a year.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MostMisclassified {
    /// Material category found in the wrong bin most often (by weight).
    #[serde(rename = "Stream")]
    pub category: Category,
    /// Its misclassified weight; may be 0 when nothing was misclassified.
    #[serde(rename = "Weight")]
    pub weight: Pounds,
}

/// Misclassified weight per actual material, from `"X in Y"` labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MisclassifiedStreams {
    weights: CategoryWeights,
    winner: MostMisclassified,
}

impl MisclassifiedStreams {
    /// Misclassified weight whose actual material is `category`.
    pub fn get(&self, category: Category) -> Pounds {
        self.weights.get(category)
    }

    /// Categories with non-zero misclassified weight, in tie-break order.
    pub fn per_category(&self) -> IndexMap<Category, Pounds> {
        MOST_MISCLASSIFIED_ORDER
            .into_iter()
            .map(|category| (category, self.weights.get(category)))
            .filter(|(_, weight)| *weight > 0.0)
            .collect()
    }

    /// Always reported, including a zero-weight winner.
    pub fn winner(&self) -> MostMisclassified {
        self.winner
    }
}

impl Serialize for MisclassifiedStreams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let per_category = self.per_category();
        let mut map = serializer.serialize_map(Some(per_category.len() + 1))?;
        for (category, weight) in &per_category {
            map.serialize_entry(category.as_str(), weight)?;
        }
        map.serialize_entry(MOST_MISCLASSIFIED_KEY, &self.winner)?;
        map.end()
    }
}

/// Weight lookup result that keeps "no records" apart from "0 lbs".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BuildingWeight {
    /// The building has no records in the selected scope.
    NoData,
    /// Summed weight, possibly zero.
    Pounds(Pounds),
}

impl BuildingWeight {
    /// Numeric weight, `None` for `NoData`.
    pub fn pounds(self) -> Option<Pounds> {
        match self {
            BuildingWeight::NoData => None,
            BuildingWeight::Pounds(weight) => Some(weight),
        }
    }
}

impl fmt::Display for BuildingWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildingWeight::NoData => f.pad(NO_DATA),
            BuildingWeight::Pounds(weight) => f.pad(&format_pounds(*weight)),
        }
    }
}

/// Total weight per building for one year, in first-appearance order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildingTotals {
    totals: IndexMap<BuildingName, Pounds>,
}

impl BuildingTotals {
    /// Weight for `building`, or `NoData` when it has no records.
    pub fn get(&self, building: &str) -> BuildingWeight {
        self.totals
            .get(building)
            .map_or(BuildingWeight::NoData, |weight| {
                BuildingWeight::Pounds(round_weight(*weight))
            })
    }

    /// `(building, weight)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Pounds)> + '_ {
        self.totals
            .iter()
            .map(|(building, weight)| (building.as_str(), round_weight(*weight)))
    }

    /// Number of buildings with data.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// True when no building has data.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// First building reaching the maximum total.
    ///
    /// Compared on the unrounded sums; only the reported weight is rounded.
    pub fn highest(&self) -> Option<(&str, Pounds)> {
        let mut best: Option<(&str, Pounds)> = None;
        for (building, weight) in &self.totals {
            match best {
                Some((_, top)) if *weight <= top => {}
                _ => best = Some((building.as_str(), *weight)),
            }
        }
        best.map(|(building, weight)| (building, round_weight(weight)))
    }
}

impl Serialize for BuildingTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (building, weight) in self.iter() {
            map.serialize_entry(building, &weight)?;
        }
        map.end()
    }
}

impl WasteDataset {
    /// Sum of every weight collected in `year`, with no category filtering.
    pub fn total_waste(&self, year: Year) -> Pounds {
        round_weight(self.in_year(year).map(WasteRecord::weight).sum())
    }

    /// Correctly classified weight per category for `year`.
    ///
    /// A record counts when its stream is a pure category label and its
    /// substream names neither of the other two categories.
    pub fn category_totals(&self, year: Year) -> CategoryTotals {
        let mut weights = CategoryWeights::default();
        for record in self.in_year(year) {
            if let Some(category) = correct_category(record.label(), record.substream()) {
                weights.add(category, record.weight());
            }
        }
        let weights = weights.rounded();
        CategoryTotals {
            weights,
            total_waste: round_weight(weights.sum()),
        }
    }

    /// Misclassified weight for `year` using the containment rules.
    ///
    /// See `classification::containment_attribution` for the precedence.
    pub fn misclassified_weight(&self, year: Year) -> MisclassificationReport {
        let (weights, total_misclassified) = attribute_misclassified(self.in_year(year));
        MisclassificationReport {
            weights,
            total_misclassified,
        }
    }

    /// Misclassified weight per actual material for `year`, plus the winner.
    pub fn most_misclassified_stream(&self, year: Year) -> MisclassifiedStreams {
        let mut weights = CategoryWeights::default();
        for record in self.in_year(year) {
            if let StreamLabel::Misclassified { actual, .. } = record.label() {
                weights.add(actual, record.weight());
            }
        }
        let (category, weight) = weights.largest_in(&MOST_MISCLASSIFIED_ORDER);
        MisclassifiedStreams {
            weights: weights.rounded(),
            winner: MostMisclassified {
                category,
                weight: round_weight(weight),
            },
        }
    }

    /// Containment-attributed misclassified weight for one building.
    ///
    /// All three categories are always present.
    pub fn misclassified_weight_for_building(
        &self,
        year: Year,
        building: &str,
    ) -> CategoryWeights {
        attribute_misclassified(self.in_year_for_building(year, building)).0
    }

    /// Total weight per building for `year`, over every record.
    pub fn building_totals(&self, year: Year) -> BuildingTotals {
        let mut totals: IndexMap<BuildingName, Pounds> = IndexMap::new();
        for record in self.in_year(year) {
            *totals.entry(record.building().to_string()).or_insert(0.0) += record.weight();
        }
        BuildingTotals { totals }
    }
}

/// Apply the containment rules; each weight is rounded before accumulation.
fn attribute_misclassified<'a>(
    records: impl Iterator<Item = &'a WasteRecord>,
) -> (CategoryWeights, Pounds) {
    let mut weights = CategoryWeights::default();
    let mut total = 0.0;
    for record in records {
        if let Some(category) = containment_attribution(record.mentions()) {
            let weight = round_weight(record.weight());
            weights.add(category, weight);
            total += weight;
        }
    }
    (weights.rounded(), round_weight(total))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(
        year: i32,
        building: &str,
        stream: &str,
        substream: &str,
        weight: f64,
    ) -> WasteRecord {
        let date = NaiveDate::from_ymd_opt(year, 4, 15).unwrap();
        WasteRecord::new(date, building, stream, substream, weight).unwrap()
    }

    fn dataset(records: Vec<WasteRecord>) -> WasteDataset {
        WasteDataset::new(records)
    }

    #[test]
    fn empty_year_yields_zero_aggregates() {
        let data = dataset(vec![record(2022, "Lucas", "Landfill", "", 4.0)]);
        assert_eq!(data.total_waste(2023), 0.0);
        let totals = data.category_totals(2023);
        for category in Category::ALL {
            assert_eq!(totals.get(category), 0.0);
        }
        assert_eq!(totals.total_waste(), 0.0);
        assert!(data.building_totals(2023).is_empty());
        assert_eq!(data.misclassified_weight(2023).total_misclassified(), 0.0);
    }

    #[test]
    fn lucas_example_matches_expected_totals() {
        let data = dataset(vec![
            record(2023, "Lucas", "Landfill", "", 5.0),
            record(2023, "Lucas", "Recycling in Landfill", "", 3.0),
        ]);
        assert_eq!(data.total_waste(2023), 8.0);
        assert_eq!(data.category_totals(2023).get(Category::Landfill), 5.0);
        assert_eq!(
            data.building_totals(2023).get("Lucas"),
            BuildingWeight::Pounds(8.0)
        );
        assert_eq!(
            data.most_misclassified_stream(2023).get(Category::Recycling),
            3.0
        );
    }

    #[test]
    fn category_total_waste_is_sum_of_categories() {
        let data = dataset(vec![
            record(2023, "Lucas", "Landfill", "", 1.1),
            record(2023, "Lucas", "Recycle", "Cans", 2.2),
            record(2023, "Swig", "Recycling", "", 0.3),
            record(2023, "Swig", "Compost", "Food", 4.44),
            record(2023, "Swig", "Recycling in Compost", "", 9.0),
        ]);
        let totals = data.category_totals(2023);
        let expected = totals.get(Category::Landfill)
            + totals.get(Category::Recycling)
            + totals.get(Category::Compost);
        assert!((totals.total_waste() - expected).abs() < 1e-9);
        assert!((totals.get(Category::Recycling) - 2.5).abs() < 1e-9);
        assert!(totals.total_waste() < data.total_waste(2023));
    }

    #[test]
    fn category_total_waste_is_rounded() {
        let data = dataset(vec![
            record(2023, "Lucas", "Landfill", "", 0.1),
            record(2023, "Lucas", "Recycling", "", 0.2),
        ]);
        let totals = data.category_totals(2023);
        assert_eq!(totals.total_waste(), 0.3);
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["Total Waste"], serde_json::json!(0.3));
    }

    #[test]
    fn substream_mentioning_other_bin_is_excluded_from_correct_totals() {
        let data = dataset(vec![
            record(2023, "Lucas", "Landfill", "Recycling mixed in", 6.0),
            record(2023, "Lucas", "Compost", "Landfill items", 2.0),
            record(2023, "Lucas", "Recycling", "Compost residue", 1.0),
            record(2023, "Lucas", "Recycling", "Paper", 1.5),
        ]);
        let totals = data.category_totals(2023);
        assert_eq!(totals.get(Category::Landfill), 0.0);
        assert_eq!(totals.get(Category::Compost), 0.0);
        assert_eq!(totals.get(Category::Recycling), 1.5);
    }

    #[test]
    fn recycling_in_landfill_goes_to_landfill_in_containment_report() {
        let data = dataset(vec![record(2023, "Lucas", "Recycling in Landfill", "", 10.0)]);
        let report = data.misclassified_weight(2023);
        assert_eq!(report.get(Category::Landfill), 10.0);
        assert_eq!(report.get(Category::Recycling), 0.0);
        assert_eq!(report.total_misclassified(), 10.0);
        assert_eq!(
            data.most_misclassified_stream(2023).get(Category::Recycling),
            10.0
        );
    }

    #[test]
    fn recycling_compost_pairs_are_not_attributed() {
        let data = dataset(vec![
            record(2023, "Lucas", "Recycling in Compost", "", 4.0),
            record(2023, "Lucas", "Compost in Recycling", "", 2.0),
            record(2023, "Lucas", "Compost in Landfill", "", 1.0),
        ]);
        let report = data.misclassified_weight(2023);
        assert_eq!(report.get(Category::Recycling), 0.0);
        assert_eq!(report.get(Category::Compost), 0.0);
        assert_eq!(report.get(Category::Landfill), 1.0);
        assert_eq!(report.total_misclassified(), 1.0);
        assert_eq!(report.largest(), (Category::Landfill, 1.0));
    }

    #[test]
    fn containment_report_rounds_each_weight() {
        let data = dataset(vec![
            record(2023, "Lucas", "Landfill in Compost", "", 1.004),
            record(2023, "Lucas", "Landfill in Compost", "", 1.004),
        ]);
        assert_eq!(data.misclassified_weight(2023).get(Category::Landfill), 2.0);
    }

    #[test]
    fn most_misclassified_breaks_ties_in_fixed_order() {
        let data = dataset(vec![
            record(2023, "Lucas", "Recycling in Landfill", "", 5.0),
            record(2023, "Lucas", "Landfill in Recycling", "", 5.0),
        ]);
        let streams = data.most_misclassified_stream(2023);
        assert_eq!(
            streams.winner(),
            MostMisclassified {
                category: Category::Landfill,
                weight: 5.0,
            }
        );
        let per_category = streams.per_category();
        assert_eq!(
            per_category.keys().copied().collect::<Vec<_>>(),
            vec![Category::Landfill, Category::Recycling]
        );
    }

    #[test]
    fn most_misclassified_reports_zero_winner_without_misclassification() {
        let data = dataset(vec![record(2023, "Lucas", "Landfill", "", 5.0)]);
        let streams = data.most_misclassified_stream(2023);
        assert!(streams.per_category().is_empty());
        assert_eq!(streams.winner().category, Category::Compost);
        assert_eq!(streams.winner().weight, 0.0);
    }

    #[test]
    fn unrecognized_stream_counts_only_in_raw_totals() {
        let data = dataset(vec![record(2023, "Lucas", "Garbage", "", 7.0)]);
        assert_eq!(data.total_waste(2023), 7.0);
        assert_eq!(
            data.building_totals(2023).get("Lucas"),
            BuildingWeight::Pounds(7.0)
        );
        assert_eq!(data.category_totals(2023).total_waste(), 0.0);
        assert_eq!(data.misclassified_weight(2023).total_misclassified(), 0.0);
        assert!(data.most_misclassified_stream(2023).per_category().is_empty());
    }

    #[test]
    fn building_scope_always_has_three_keys() {
        let data = dataset(vec![
            record(2023, "Lucas", "Compost in Landfill", "", 2.5),
            record(2023, "Swig", "Recycling in Landfill", "", 9.0),
        ]);
        let lucas = data.misclassified_weight_for_building(2023, "Lucas");
        assert_eq!(lucas[Category::Landfill], 2.5);
        assert_eq!(lucas[Category::Recycling], 0.0);
        assert_eq!(lucas[Category::Compost], 0.0);

        let empty = data.misclassified_weight_for_building(2023, "Benson");
        assert_eq!(empty.iter().count(), 3);
        assert_eq!(empty.sum(), 0.0);

        let json = serde_json::to_value(empty).unwrap();
        let object = json.as_object().unwrap();
        for key in ["Landfill", "Recycling", "Compost"] {
            assert_eq!(object[key], 0.0);
        }
    }

    #[test]
    fn building_totals_distinguish_zero_from_no_data() {
        let data = dataset(vec![
            record(2023, "Lucas", "Landfill", "", 0.0),
            record(2023, "Swig", "Landfill", "", 1.25),
            record(2023, "Swig", "Garbage", "", 1.0),
        ]);
        let totals = data.building_totals(2023);
        assert_eq!(totals.get("Lucas"), BuildingWeight::Pounds(0.0));
        assert_eq!(totals.get("Swig"), BuildingWeight::Pounds(2.25));
        assert_eq!(totals.get("Benson"), BuildingWeight::NoData);
        assert_eq!(totals.get("Benson").to_string(), "No Data");
        assert_eq!(totals.get("Swig").to_string(), "2.25 lbs");
        assert_eq!(totals.highest(), Some(("Swig", 2.25)));
    }

    #[test]
    fn highest_building_prefers_first_on_ties() {
        let data = dataset(vec![
            record(2023, "Lucas", "Landfill", "", 3.0),
            record(2023, "Swig", "Landfill", "", 3.0),
        ]);
        assert_eq!(data.building_totals(2023).highest(), Some(("Lucas", 3.0)));
        assert_eq!(BuildingTotals::default().highest(), None);
    }

    #[test]
    fn highest_building_compares_unrounded_totals() {
        let data = dataset(vec![
            record(2023, "First", "Landfill", "", 3.001),
            record(2023, "Second", "Landfill", "", 3.004),
        ]);
        let totals = data.building_totals(2023);
        assert_eq!(totals.highest(), Some(("Second", 3.0)));
        assert_eq!(totals.get("First"), BuildingWeight::Pounds(3.0));
        let top = data.highest_waste_building(2023).unwrap();
        assert_eq!(top.building, "Second");
        assert_eq!(top.weight, 3.0);
    }

    #[test]
    fn reports_serialize_with_fixed_keys() {
        let data = dataset(vec![
            record(2023, "Lucas", "Landfill", "", 5.0),
            record(2023, "Lucas", "Recycling in Landfill", "", 3.0),
        ]);
        let totals = serde_json::to_value(data.category_totals(2023)).unwrap();
        assert_eq!(totals["Landfill"], 5.0);
        assert_eq!(totals["Total Waste"], 5.0);

        let report = serde_json::to_value(data.misclassified_weight(2023)).unwrap();
        assert_eq!(report["Total Misclassified Waste"], 3.0);

        let streams = serde_json::to_value(data.most_misclassified_stream(2023)).unwrap();
        assert_eq!(streams["Recycling"], 3.0);
        assert_eq!(streams["Most Misclassified Stream"]["Stream"], "Recycling");
        assert_eq!(streams["Most Misclassified Stream"]["Weight"], 3.0);
        assert!(streams.get("Compost").is_none());
    }
}
