//! Data model shared by the joinscout crates.

pub mod config;
pub mod error;
pub mod profile;
pub mod result;
pub mod table;

pub use config::{JoinTypePriors, MatchConfig};
pub use error::{ModelError, Result};
pub use profile::{ColumnProfile, normalized_distinct};
pub use result::{
    AnalysisResult, AttributeOutcome, AttributeResult, AttributeWarning, JoinCandidate,
    JoinEstimate, JoinType, KeyPair,
};
pub use table::{Column, Table, TableSource, ValueType};
