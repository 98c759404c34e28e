/// Identifier for the source that produced a dataset.
/// Examples: `csv:assign2_wastedata.csv`, `in_memory`
pub type SourceId = String;
/// Building name exactly as it appears in the `Building` column.
/// Examples: `Lucas`, `Benson Center`, `Swig`
pub type BuildingName = String;
/// Raw stream label text.
/// Examples: `Landfill`, `Recycling in Landfill`, `Compost in Recycling`
pub type StreamText = String;
/// Calendar year used to scope every aggregation.
/// Example: `2023`
pub type Year = i32;
/// Weight in pounds.
/// Example: `12.5`
pub type Pounds = f64;
