//! Masking of OAuth-sourced configuration fields on the write path.
//!
//! Values obtained through an OAuth consent flow are never typed by the
//! caller, so they must not be echoed back even on a write acknowledgment.
//! This masker applies the output placeholder to the OAuth-annotated subset
//! of secret fields, leaving plain secrets for the general output-masking
//! step.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::secrets::mask_paths;
use crate::spec::SecretFields;

/// Masks configuration fields populated from an OAuth consent flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct OAuthParamsMasker;

impl OAuthParamsMasker {
    /// Create a new masker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Replace every OAuth-sourced leaf in `document` with the placeholder.
    ///
    /// Plain (non-OAuth) secrets are left untouched; output masking handles
    /// them separately on the read path.
    #[must_use]
    pub fn mask_oauth_params(
        &self,
        definition_id: Uuid,
        workspace_id: Uuid,
        document: &Value,
        fields: &SecretFields,
    ) -> Value {
        if fields.oauth_paths().is_empty() {
            return document.clone();
        }

        debug!(
            definition_id = %definition_id,
            workspace_id = %workspace_id,
            oauth_fields = fields.oauth_paths().len(),
            "Masking OAuth-sourced configuration fields"
        );

        mask_paths(document, fields.oauth_paths())
    }
}
