use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SketchError {
    #[error(
        "sketches are not comparable: {left_perm} permutations (seed {left_seed}) \
         vs {right_perm} permutations (seed {right_seed})"
    )]
    IncompatibleSketches {
        left_perm: usize,
        left_seed: u64,
        right_perm: usize,
        right_seed: u64,
    },

    #[error("invalid index parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },
}

impl SketchError {
    pub(crate) fn parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SketchError>;
