//! Resolution of the effective connector specification for a record.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{DestinationApiError, Result};
use crate::store::{DefinitionVersion, DestinationDefinition, VersionCatalog};
use wharf_connector::spec::SecretFields;

/// A resolved specification version, with its secret-field classification
/// computed once for reuse across every mask and reconcile call.
#[derive(Debug, Clone)]
pub struct ResolvedSpecification {
    /// The definition version in effect.
    pub version: DefinitionVersion,

    /// Secret field paths declared by the version's specification.
    pub secret_fields: SecretFields,
}

/// Resolves which specification version governs an operation.
///
/// Precedence: the version pinned to the specific record, else the
/// workspace-level override, else the definition's global default. Pure
/// lookup, no mutation.
pub struct SpecResolver {
    catalog: Arc<dyn VersionCatalog>,
}

impl SpecResolver {
    /// Create a resolver backed by a version catalog.
    pub fn new(catalog: Arc<dyn VersionCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve the effective specification for a definition in a workspace.
    ///
    /// `record_pin` is the version pinned to the record being operated on,
    /// when one exists (create paths have none).
    pub async fn resolve(
        &self,
        definition: &DestinationDefinition,
        workspace_id: Uuid,
        record_pin: Option<Uuid>,
    ) -> Result<ResolvedSpecification> {
        let version_id = match record_pin {
            Some(version_id) => version_id,
            None => self
                .catalog
                .workspace_version_override(definition.definition_id, workspace_id)
                .await
                .map_err(|e| DestinationApiError::upstream("version catalog", e))?
                .unwrap_or(definition.default_version_id),
        };

        let version = self
            .catalog
            .get_version(version_id)
            .await
            .map_err(|e| DestinationApiError::upstream("version catalog", e))?
            .ok_or(DestinationApiError::VersionNotFound(version_id))?;

        let secret_fields = version.spec.secret_fields();

        Ok(ResolvedSpecification {
            version,
            secret_fields,
        })
    }
}
