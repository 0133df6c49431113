//! Secret-pipeline error types.

use thiserror::Error;

/// Error that can occur during schema-driven secret processing.
#[derive(Debug, Error)]
pub enum SecretsError {
    /// A field in the incoming document could not be classified against the
    /// connection specification.
    #[error("cannot classify field '{path}' against the connection specification")]
    SchemaMismatch { path: String },

    /// The connection specification is not a usable JSON Schema object.
    #[error("invalid connection specification: {message}")]
    InvalidSpecification { message: String },
}

/// Result type for secret-processing operations.
pub type SecretsResult<T> = std::result::Result<T, SecretsError>;
