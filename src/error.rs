use thiserror::Error;

/// Failures raised by scheme resolution, validation and editing.
///
/// Callers map these onto their own presentation (exit codes, HTTP statuses);
/// the engine never retries since matching is deterministic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemeError {
    #[error("No scheme matches the document header")]
    SchemeNotFound,

    #[error("Schemes could not be loaded: {0}")]
    SchemeNotLoaded(String),

    #[error("Duplicate columns {}, document does not conform to the scheme", .0.join(", "))]
    DuplicateColumns(Vec<String>),

    #[error("Missing required columns {}", .0.join(";"))]
    MissingRequiredColumns(Vec<String>),

    #[error("Column '{0}' is not defined in the scheme")]
    ColumnNotFound(String),

    #[error("Column '{0}' is already defined in the scheme")]
    DuplicateColumnName(String),

    #[error("Attribute '{0}' is not defined in the scheme header")]
    AttributeNotFound(String),

    #[error("Scheme header has no attributes")]
    MissingAttributes,

    #[error("Column '{column}' has an invalid pattern: {reason}")]
    InvalidPattern { column: String, reason: String },
}

pub type SchemeResult<T> = std::result::Result<T, SchemeError>;
