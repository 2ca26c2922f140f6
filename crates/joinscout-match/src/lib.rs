//! Join candidate discovery for newly added attributes.
//!
//! - [`AttributeMatcher`]: end-to-end analysis of an evolved table
//! - [`OverlapKeyFinder`]: sampled join key discovery between two tables
//! - [`JoinTypeEstimator`]: join type likelihoods from row counts

pub mod engine;
pub mod error;
pub mod join_type;
pub mod overlap;

pub use engine::{AttributeMatcher, added_columns};
pub use error::{MatchError, Result};
pub use join_type::JoinTypeEstimator;
pub use overlap::{OverlapKeyFinder, overlap_ratio};
