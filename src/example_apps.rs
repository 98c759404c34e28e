use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::config::DashboardConfig;
use crate::dashboard::{YearReport, donut_slices};
use crate::data::Category;
use crate::metrics::format_pounds;
use crate::types::Year;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "waste_report",
    disable_help_subcommand = true,
    about = "Summarize a waste audit for one year",
    long_about = "Load a waste audit CSV and print the scorecards, correct and misclassified totals, per-building totals, and chart series for one year.",
    after_help = "Input paths are optional and resolved in order by explicit arg, environment variables (WASTE_DATA_PATH, WASTE_GEOMETRY_PATH), then project defaults."
)]
/// CLI for `waste_report`.
///
/// Common usage:
/// - Report the heaviest year from the default dataset: `waste_report`
/// - Pick a year and building: `--year 2023 --building Lucas`
/// - Add map shades: `--geometry building_geojson.json`
/// - Emit machine-readable output: `--format json`
struct WasteReportCli {
    #[arg(long = "data", value_name = "PATH", help = "Waste audit CSV path")]
    data_path: Option<PathBuf>,
    #[arg(
        long = "geometry",
        value_name = "PATH",
        help = "Optional GeoJSON building registry for map shades"
    )]
    geometry_path: Option<PathBuf>,
    #[arg(long, help = "Year to report; defaults to the year with the most waste")]
    year: Option<Year>,
    #[arg(
        long,
        help = "Building for the per-building charts; defaults to the first building in the year"
    )]
    building: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help = "Output format")]
    format: OutputFormat,
}

/// Run the `waste_report` CLI with arguments excluding the program name.
pub fn run_waste_report<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<WasteReportCli, _>(
        std::iter::once("waste_report".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let config = DashboardConfig::resolve(cli.data_path, cli.geometry_path);
    let dataset = config.load_dataset()?;
    let registry = config.load_registry()?;

    let Some(year) = cli.year.or_else(|| dataset.available_years().first().copied()) else {
        println!(
            "Dataset {} contains no records.",
            config.data_path.display()
        );
        return Ok(());
    };

    let report = YearReport::build(&dataset, year, cli.building.as_deref(), registry.as_ref());
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &YearReport) {
    let cards = &report.scorecards;
    println!("=== Waste report for {} ===", cards.year);
    println!("Total waste in year:        {}", format_pounds(cards.total_waste));
    match &cards.highest_building {
        Some(score) => println!(
            "Building with highest waste: {} ({})",
            score.building,
            format_pounds(score.weight)
        ),
        None => println!("Building with highest waste: none"),
    }
    println!(
        "Most misclassified stream:  {} ({})",
        cards.most_misclassified.category,
        format_pounds(cards.most_misclassified.weight)
    );

    println!();
    println!("Correctly classified:");
    for (category, weight) in report.category_totals.weights().iter() {
        println!("  {:<12} {:>14}", category, format_pounds(weight));
    }
    println!(
        "  {:<12} {:>14}",
        "Total",
        format_pounds(report.category_totals.total_waste())
    );

    println!();
    println!("Misclassified (by containing bin):");
    for (category, weight) in report.misclassified.weights().iter() {
        println!("  {:<12} {:>14}", category, format_pounds(weight));
    }
    println!(
        "  {:<12} {:>14}",
        "Total",
        format_pounds(report.misclassified.total_misclassified())
    );

    println!();
    println!("Misclassified (by actual material):");
    let per_category = report.misclassified_streams.per_category();
    if per_category.is_empty() {
        println!("  none");
    }
    for (category, weight) in &per_category {
        println!("  {:<12} {:>14}", category, format_pounds(*weight));
    }

    println!();
    println!("Waste by building:");
    for (building, weight) in report.building_totals.iter() {
        println!("  {:<24} {:>14}", building, format_pounds(weight));
    }

    if let Some(building) = &report.building {
        println!();
        println!("Building {}:", building.building);
        for slice in donut_slices(&building.correct) {
            println!(
                "  correct {:<12} {:>14} {:>6.1}%",
                slice.category,
                format_pounds(slice.weight),
                slice.percent
            );
        }
        for category in Category::ALL {
            println!(
                "  misclassified {:<12} {:>14}",
                category,
                format_pounds(building.misclassified.get(category))
            );
        }
    }

    if !report.misclassification_series.is_empty() {
        println!();
        println!("Misclassification series (building x stream):");
        let streams = report.misclassification_series.streams();
        for building in report.misclassification_series.buildings() {
            for stream in &streams {
                if let Some(weight) = report.misclassification_series.get(building, stream) {
                    println!(
                        "  {:<24} {:<28} {:>14}",
                        building,
                        stream,
                        format_pounds(weight)
                    );
                }
            }
        }
    }

    if let Some(shades) = &report.shades {
        println!();
        println!("Map shades:");
        for shade in shades {
            println!("  {:<24} {:>14}", shade.building, shade.weight);
        }
    }
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
