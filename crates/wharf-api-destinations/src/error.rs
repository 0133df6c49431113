//! Destination API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::store::StoreError;
use wharf_connector::error::SecretsError;

/// Error type for destination API operations.
#[derive(Debug, Error)]
pub enum DestinationApiError {
    /// Destination record not found (or tombstoned).
    #[error("destination not found: {0}")]
    DestinationNotFound(Uuid),

    /// Destination definition not found.
    #[error("destination definition not found: {0}")]
    DefinitionNotFound(Uuid),

    /// Definition version not found in the catalog.
    #[error("definition version not found: {0}")]
    VersionNotFound(Uuid),

    /// Configuration document failed schema validation.
    #[error("configuration failed schema validation at '{path}': {message}")]
    Validation { path: String, message: String },

    /// Request shape is invalid (lengths, missing fields).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Secret reconciliation could not classify a field.
    #[error(transparent)]
    Secrets(#[from] SecretsError),

    /// Concurrent write detected by the persistence collaborator; retryable.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A collaborator failed.
    #[error("{collaborator} failed: {message}")]
    Upstream {
        collaborator: &'static str,
        message: String,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DestinationApiError {
    /// Wrap a store-level error, naming the collaborator that failed.
    pub fn upstream(collaborator: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => DestinationApiError::Conflict(message),
            StoreError::Backend(message) => DestinationApiError::Upstream {
                collaborator,
                message,
            },
        }
    }
}

impl IntoResponse for DestinationApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            DestinationApiError::DestinationNotFound(_) => {
                (StatusCode::NOT_FOUND, "destination_not_found")
            }
            DestinationApiError::DefinitionNotFound(_) => {
                (StatusCode::NOT_FOUND, "definition_not_found")
            }
            DestinationApiError::VersionNotFound(_) => (StatusCode::NOT_FOUND, "version_not_found"),
            DestinationApiError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            DestinationApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            DestinationApiError::Secrets(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "schema_mismatch")
            }
            DestinationApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            DestinationApiError::Upstream { collaborator, .. } => {
                error!(collaborator = %collaborator, error = %self, "Collaborator failure");
                (StatusCode::BAD_GATEWAY, "upstream_error")
            }
            DestinationApiError::Internal(_) => {
                error!(error = %self, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = json!({
            "error": error_type,
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for destination API operations.
pub type Result<T> = std::result::Result<T, DestinationApiError>;
