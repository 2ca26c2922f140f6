use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid configuration for {field}: {message}")]
    InvalidConfig { field: &'static str, message: String },

    #[error("column {column} has {actual} cells but table {table} has {expected} rows")]
    ColumnLength {
        table: String,
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column {column} in table {table}")]
    DuplicateColumn { table: String, column: String },
}

impl ModelError {
    pub(crate) fn config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
