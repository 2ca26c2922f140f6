//! Value normalization shared by candidate and evolved tables.

use crate::polars::format_numeric;

/// Normalizes a raw cell for sketching: trims whitespace and lowercases.
///
/// Candidate columns and newly added columns must both go through this
/// function, otherwise their sketches are not comparable.
pub fn normalize_value(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parses a float cell and re-prints it without trailing zeros.
///
/// Returns `None` when the text is blank or not a number.
pub fn canonical_float(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().map(format_numeric)
}
