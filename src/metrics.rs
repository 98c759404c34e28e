use crate::constants::report::{POUNDS_SUFFIX, WEIGHT_DECIMALS};
use crate::types::Pounds;

/// Round a weight to the user-facing precision (two decimal places).
pub fn round_weight(value: Pounds) -> Pounds {
    let scale = 10f64.powi(WEIGHT_DECIMALS);
    (value * scale).round() / scale
}

/// Format a weight with its unit, e.g. `12.5 lbs`.
///
/// The value is rounded first; trailing zeros are not padded.
pub fn format_pounds(value: Pounds) -> String {
    format!("{} {}", round_weight(value), POUNDS_SUFFIX)
}

/// Share of `part` in `total` as a percentage, `0.0` when `total` is zero.
///
/// Used for donut chart slice labels.
pub fn percentage(part: Pounds, total: Pounds) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}
