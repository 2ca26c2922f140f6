//! Set sketches and approximate containment search over column value sets.
//!
//! - [`Sketch`] / [`Permutations`]: MinHash signatures and Jaccard estimates
//! - [`ContainmentIndex`]: LSH Ensemble index answering "which indexed sets
//!   contain at least a threshold fraction of this query set"

pub mod ensemble;
pub mod error;
mod lsh;
pub mod minhash;
mod params;
mod partition;

pub use ensemble::{ContainmentIndex, EnsembleParams, IndexEntry};
pub use error::{Result, SketchError};
pub use minhash::{DEFAULT_SEED, Permutations, Sketch, hash_value};
