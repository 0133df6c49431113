//! Configuration document validation against connection specifications.

use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::warn;

use crate::error::{DestinationApiError, Result};

/// Validates configuration documents against a connection specification.
///
/// Uses `jsonschema::JSONSchema::compile()` and reports the first violation
/// together with its instance path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Create a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Ensure `document` conforms to `schema`.
    pub fn ensure(&self, schema: &Value, document: &Value) -> Result<()> {
        let compiled = JSONSchema::compile(schema).map_err(|e| {
            warn!(error = %e, "Failed to compile connection specification");
            DestinationApiError::Internal(format!("invalid connection specification: {e}"))
        })?;

        let violation = match compiled.validate(document) {
            Ok(()) => None,
            Err(mut errors) => errors
                .next()
                .map(|e| (e.instance_path.to_string(), e.to_string())),
        };

        if let Some((path, message)) = violation {
            return Err(DestinationApiError::Validation { path, message });
        }
        Ok(())
    }
}
