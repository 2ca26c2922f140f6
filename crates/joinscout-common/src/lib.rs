//! Shared utilities for joinscout crates.
//!
//! Value normalization used for sketching, canonical cell text used for
//! exact overlap comparison, and Polars `AnyValue` conversion helpers.

pub mod normalize;
pub mod polars;

pub use normalize::{canonical_float, normalize_value};
pub use polars::{any_to_cell, format_numeric};
