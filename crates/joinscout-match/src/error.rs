use joinscout_ingest::IngestError;
use joinscout_model::ModelError;
use joinscout_sketch::SketchError;
use thiserror::Error;

/// Errors that abort an analysis call.
///
/// Per-attribute problems (no values, no matches) are not errors; they are
/// reported as warnings inside the result.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ModelError),

    #[error("failed to load table: {0}")]
    Ingest(#[from] IngestError),

    #[error("sketch error: {0}")]
    Sketch(#[from] SketchError),
}

pub type Result<T> = std::result::Result<T, MatchError>;
