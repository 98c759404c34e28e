/// Constants describing the closed waste-category taxonomy and its labels.
pub mod category {
    /// Label for landfill waste and the landfill bin.
    pub const LANDFILL: &str = "Landfill";
    /// Label for recyclable material and the recycling bin.
    pub const RECYCLING: &str = "Recycling";
    /// Alternate spelling used by some rows for correctly sorted recyclables.
    pub const RECYCLE_ALIAS: &str = "Recycle";
    /// Label for compostable material and the compost bin.
    pub const COMPOST: &str = "Compost";
    /// Separator between the actual material and the bin it was found in.
    ///
    /// Example: `Recycling in Landfill`.
    pub const MISCLASSIFICATION_SEPARATOR: &str = " in ";
}

/// Output keys and display strings shared by the reports.
pub mod report {
    /// Key carrying the sum of the three correctly classified category totals.
    pub const TOTAL_WASTE_KEY: &str = "Total Waste";
    /// Key carrying the running misclassified total.
    pub const TOTAL_MISCLASSIFIED_KEY: &str = "Total Misclassified Waste";
    /// Key carrying the most misclassified stream summary.
    pub const MOST_MISCLASSIFIED_KEY: &str = "Most Misclassified Stream";
    /// Display value for buildings without records in the selected scope.
    pub const NO_DATA: &str = "No Data";
    /// Unit suffix appended to user-facing weights.
    pub const POUNDS_SUFFIX: &str = "lbs";
    /// Decimal places kept on user-facing weights.
    pub const WEIGHT_DECIMALS: i32 = 2;
}

/// Constants used by dataset loading and path resolution.
pub mod source {
    /// Source id used by `InMemorySource` unless overridden.
    pub const IN_MEMORY_SOURCE_ID: &str = "in_memory";
    /// Prefix applied to CSV source ids (`csv:<file name>`).
    pub const CSV_SOURCE_PREFIX: &str = "csv:";
}

/// Constants used by configuration defaults and environment overrides.
pub mod config {
    /// Default waste dataset file name, resolved relative to the working directory.
    pub const DEFAULT_DATA_FILENAME: &str = "assign2_wastedata.csv";
    /// Environment variable overriding the dataset path.
    pub const DATA_PATH_ENV: &str = "WASTE_DATA_PATH";
    /// Environment variable overriding the geometry path.
    pub const GEOMETRY_PATH_ENV: &str = "WASTE_GEOMETRY_PATH";
}

/// Constants used by the building-geometry registry.
pub mod geometry {
    /// Feature property holding the building name.
    pub const BUILDING_PROPERTY: &str = "Building";
    /// Log message used when a feature carries no usable building name.
    pub const SKIP_UNNAMED_FEATURE_MSG: &str = "skipping geometry feature without building name";
}
