use thiserror::Error;

/// Canonical result for the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// The engine error taxonomy. Every operation fails synchronously at the
/// point of the offending call; nothing is deferred and there are no side
/// effects to roll back.
#[derive(Debug, Error)]
pub enum Error {
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    #[error("ambiguous selection: {0}")]
    AmbiguousSelection(String),

    #[error("type conflict: {0}")]
    TypeConflict(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("schema conflict: {0}")]
    SchemaConflict(String),

    // Raised by strict-mode aggregation when a missing value is encountered;
    // callers opt out with `MissingPolicy::Skip`.
    #[error("missing value: {0}")]
    MissingValue(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SchemaViolation(e.to_string())
    }
}
