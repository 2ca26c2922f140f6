//! Result types produced by an attribute analysis.

use std::fmt;

use serde::Serialize;

/// Structural category of a relational join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    /// All join types in tie-breaking order.
    pub const ALL: [JoinType; 5] = [
        JoinType::Inner,
        JoinType::Left,
        JoinType::Right,
        JoinType::Full,
        JoinType::Cross,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Left => "left",
            Self::Right => "right",
            Self::Full => "full",
            Self::Cross => "cross",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Most probable join type plus the full normalized distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinEstimate {
    pub join_type: JoinType,
    /// Normalized probability of `join_type` (0.0 to 1.0).
    pub probability: f64,
    /// Normalized probabilities in [`JoinType::ALL`] order; sums to 1.
    pub distribution: [f64; 5],
}

impl JoinEstimate {
    pub fn probability_of(&self, join_type: JoinType) -> f64 {
        JoinType::ALL
            .iter()
            .position(|candidate| *candidate == join_type)
            .map_or(0.0, |idx| self.distribution[idx])
    }
}

/// A column pair usable as a join key with its sampled overlap ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyPair {
    /// Column in the base table.
    pub left: String,
    /// Column in the candidate table.
    pub right: String,
    /// Overlap ratio (0.0 to 1.0).
    pub overlap: f64,
}

impl KeyPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>, overlap: f64) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            overlap,
        }
    }
}

/// A candidate column that can likely supply a newly added attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinCandidate {
    pub table: String,
    pub column: String,
    /// Estimated Jaccard similarity with the added column (0.0 to 1.0).
    pub similarity: f64,
    pub join: JoinEstimate,
    /// Join keys ranked by descending overlap; never empty.
    pub keys: Vec<KeyPair>,
}

impl JoinCandidate {
    pub fn best_key(&self) -> Option<&KeyPair> {
        self.keys.first()
    }
}

/// Why an attribute produced no candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeWarning {
    /// The added column has no non-missing values (or does not exist).
    NoValues,
    /// No indexed column survived querying and key discovery.
    NoGoodMatches,
}

impl AttributeWarning {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoValues => "No values found",
            Self::NoGoodMatches => "No good matches found",
        }
    }
}

/// Outcome for a single added attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum AttributeOutcome {
    Warning(AttributeWarning),
    /// Candidates ranked by descending similarity.
    Matches(Vec<JoinCandidate>),
}

impl AttributeOutcome {
    pub fn matches(&self) -> &[JoinCandidate] {
        match self {
            Self::Matches(candidates) => candidates,
            Self::Warning(_) => &[],
        }
    }

    pub fn best(&self) -> Option<&JoinCandidate> {
        self.matches().first()
    }
}

/// Result of analyzing one added attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeResult {
    pub attribute: String,
    pub outcome: AttributeOutcome,
}

/// Result of a full analysis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisResult {
    NoNewAttributes {
        base_table: String,
        new_table: String,
    },
    Success {
        base_table: String,
        new_table: String,
        added_columns: Vec<String>,
        attributes: Vec<AttributeResult>,
    },
}

impl AnalysisResult {
    pub fn added_columns(&self) -> &[String] {
        match self {
            Self::NoNewAttributes { .. } => &[],
            Self::Success { added_columns, .. } => added_columns,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeOutcome> {
        match self {
            Self::NoNewAttributes { .. } => None,
            Self::Success { attributes, .. } => attributes
                .iter()
                .find(|result| result.attribute == name)
                .map(|result| &result.outcome),
        }
    }
}
