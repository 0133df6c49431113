//! Merging of partial updates onto an existing destination record.

use chrono::Utc;
use serde_json::Value;

use crate::error::Result;
use crate::store::DestinationConnection;
use wharf_connector::secrets::SecretsProcessor;
use wharf_connector::spec::SecretFields;

/// Produces the record to validate and persist from a partial update.
///
/// Unspecified fields retain the existing record's values. A supplied
/// configuration is reconciled against the existing document first, so
/// callers never resubmit unchanged credentials and partial edits never drop
/// them.
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationMerger {
    secrets: SecretsProcessor,
}

impl ConfigurationMerger {
    /// Create a merger using the given secrets processor.
    #[must_use]
    pub fn new(secrets: SecretsProcessor) -> Self {
        Self { secrets }
    }

    /// Merge a partial update onto `existing`.
    pub fn merge(
        &self,
        existing: &DestinationConnection,
        name: Option<String>,
        configuration: Option<&Value>,
        fields: &SecretFields,
    ) -> Result<DestinationConnection> {
        let configuration = match configuration {
            Some(incoming) => {
                self.secrets
                    .reconcile_secrets(fields, &existing.configuration, incoming)?
            }
            None => existing.configuration.clone(),
        };

        Ok(DestinationConnection {
            name: name.unwrap_or_else(|| existing.name.clone()),
            configuration,
            updated_at: Utc::now(),
            ..existing.clone()
        })
    }
}
