//! Polars AnyValue utility functions.
//!
//! Cells read through Polars are carried through the rest of the workspace as
//! `Option<String>`, so every conversion from `AnyValue` goes through here.

use polars::prelude::*;

/// Converts a Polars `AnyValue` to the cell text used across the workspace.
///
/// Returns `None` for `Null` and for strings that are blank after trimming.
/// Integers keep their decimal form, floats drop trailing zeros and booleans
/// become `true`/`false`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use joinscout_common::any_to_cell;
///
/// assert_eq!(any_to_cell(AnyValue::Null), None);
/// assert_eq!(any_to_cell(AnyValue::Int32(42)), Some("42".to_string()));
/// assert_eq!(any_to_cell(AnyValue::Float64(2.50)), Some("2.5".to_string()));
/// ```
pub fn any_to_cell(value: AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.trim().to_string(),
        AnyValue::StringOwned(s) => s.trim().to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// Non-finite values keep their standard spelling.
///
/// # Examples
///
/// ```
/// use joinscout_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(100.0), "100");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if !v.is_finite() || !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_cell_null() {
        assert_eq!(any_to_cell(AnyValue::Null), None);
    }

    #[test]
    fn test_any_to_cell_integers() {
        assert_eq!(any_to_cell(AnyValue::Int32(42)), Some("42".to_string()));
        assert_eq!(any_to_cell(AnyValue::Int64(-100)), Some("-100".to_string()));
        assert_eq!(any_to_cell(AnyValue::UInt32(0)), Some("0".to_string()));
    }

    #[test]
    fn test_any_to_cell_floats() {
        assert_eq!(any_to_cell(AnyValue::Float64(1.5)), Some("1.5".to_string()));
        assert_eq!(any_to_cell(AnyValue::Float64(1.0)), Some("1".to_string()));
        assert_eq!(any_to_cell(AnyValue::Float32(20.0)), Some("20".to_string()));
    }

    #[test]
    fn test_any_to_cell_strings() {
        assert_eq!(
            any_to_cell(AnyValue::String(" hello ")),
            Some("hello".to_string())
        );
        assert_eq!(any_to_cell(AnyValue::String("   ")), None);
    }

    #[test]
    fn test_any_to_cell_boolean() {
        assert_eq!(any_to_cell(AnyValue::Boolean(true)), Some("true".to_string()));
        assert_eq!(
            any_to_cell(AnyValue::Boolean(false)),
            Some("false".to_string())
        );
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(1.5), "1.5");
        assert_eq!(format_numeric(1.50), "1.5");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(-0.0), "0");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(f64::INFINITY), "inf");
    }
}
