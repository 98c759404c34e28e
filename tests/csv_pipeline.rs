use std::fs;
use std::path::Path;

use tempfile::tempdir;

use wastestream::dashboard::donut_slices;
use wastestream::{
    BuildingRegistry, BuildingWeight, Category, CsvFileSource, DashboardConfig, WasteError,
    WasteSource, YearReport,
};

const AUDIT_CSV: &str = "\
Date,Building,Stream,Substream,Weight
01/15/2022,Benson,Landfill,,40.5
01/15/2022,Benson,Recycling in Landfill,Cans,7.25
03/02/2023,Lucas,Landfill,,5
03/02/2023,Lucas,Recycling in Landfill,,3
03/02/2023,Lucas,Recycle,Paper,4
2023-04-10,Swig,Compost,Food,6.5
2023-04-10,Swig,Compost in Recycling,,1.5
2023-04-10 00:00:00,Swig,Mixed,,2
";

const BUILDINGS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"Building": "Lucas"}, "geometry": {"type": "Polygon", "coordinates": []}},
    {"type": "Feature", "properties": {"Building": "Swig"}, "geometry": {"type": "Polygon", "coordinates": []}},
    {"type": "Feature", "properties": {"Building": "Benson"}, "geometry": {"type": "Polygon", "coordinates": []}}
  ]
}"#;

fn write_fixture(dir: &Path) -> DashboardConfig {
    let data = dir.join("assign2_wastedata.csv");
    let geometry = dir.join("building_geojson.json");
    fs::write(&data, AUDIT_CSV).unwrap();
    fs::write(&geometry, BUILDINGS_GEOJSON).unwrap();
    DashboardConfig::default()
        .with_data_path(data)
        .with_geometry_path(geometry)
}

#[test]
fn loads_csv_and_builds_year_report() {
    let temp = tempdir().unwrap();
    let config = write_fixture(temp.path());
    let dataset = config.load_dataset().unwrap();
    let registry = config.load_registry().unwrap().unwrap();

    assert_eq!(dataset.len(), 8);
    assert_eq!(dataset.available_years(), vec![2022, 2023]);
    assert_eq!(dataset.available_buildings(2023), vec!["Lucas", "Swig"]);

    let report = YearReport::build(&dataset, 2023, Some("Lucas"), Some(&registry));
    assert_eq!(report.scorecards.total_waste, 22.0);
    let highest = report.scorecards.highest_building.as_ref().unwrap();
    assert_eq!(highest.building, "Lucas");
    assert_eq!(highest.weight, 12.0);
    assert_eq!(report.scorecards.most_misclassified.category, Category::Recycling);

    assert_eq!(report.category_totals.get(Category::Recycling), 4.0);
    assert_eq!(report.category_totals.total_waste(), 15.5);
    assert_eq!(report.misclassified.get(Category::Landfill), 3.0);

    let building = report.building.as_ref().unwrap();
    let slices = donut_slices(&building.correct);
    assert_eq!(slices[0].category, Category::Landfill);
    assert!((slices[0].percent - 55.56).abs() < 1e-9);

    let shades = report.shades.as_ref().unwrap();
    let benson = shades.iter().find(|shade| shade.building == "Benson").unwrap();
    assert_eq!(benson.weight, BuildingWeight::NoData);
    assert_eq!(benson.weight.to_string(), "No Data");

    assert_eq!(
        report.misclassification_series.get("Swig", "Mixed"),
        Some(2.0)
    );
}

#[test]
fn json_output_uses_dashboard_keys() {
    let temp = tempdir().unwrap();
    let config = write_fixture(temp.path());
    let dataset = config.load_dataset().unwrap();
    let report = YearReport::build(&dataset, 2022, None, None);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["category_totals"]["Landfill"], 40.5);
    assert_eq!(json["category_totals"]["Total Waste"], 40.5);
    assert_eq!(json["misclassified"]["Total Misclassified Waste"], 7.25);
    assert_eq!(
        json["misclassified_streams"]["Most Misclassified Stream"]["Stream"],
        "Recycling"
    );
    assert_eq!(json["building"]["building"], "Benson");
    assert!(json["shades"].is_null());
}

#[test]
fn malformed_row_fails_the_whole_load() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("broken.csv");
    fs::write(
        &path,
        "Date,Building,Stream,Substream,Weight\n2023-01-01,Lucas,Landfill,,1\n2023-01-02,Lucas,Landfill,,n/a\n",
    )
    .unwrap();
    match CsvFileSource::new(&path).load() {
        Err(WasteError::InvalidRow { line, reason }) => {
            assert_eq!(line, 3);
            assert!(reason.contains("n/a"));
        }
        other => panic!("expected invalid row, got {other:?}"),
    }
}

#[test]
fn registry_buildings_outside_dataset_shade_as_no_data() {
    let temp = tempdir().unwrap();
    let config = write_fixture(temp.path());
    let dataset = config.load_dataset().unwrap();
    let registry = BuildingRegistry::load(config.geometry_path.as_ref().unwrap()).unwrap();
    let shades =
        wastestream::geometry::choropleth_shades(&registry, &dataset.building_totals(2022));
    let shaded: Vec<(&str, Option<f64>)> = shades
        .iter()
        .map(|shade| (shade.building.as_str(), shade.weight.pounds()))
        .collect();
    assert_eq!(
        shaded,
        vec![("Lucas", None), ("Swig", None), ("Benson", Some(47.75))]
    );
}
