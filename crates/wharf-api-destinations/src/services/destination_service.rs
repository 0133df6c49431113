//! Destination lifecycle orchestration.
//!
//! Every inbound write passes specification resolution, secret
//! reconciliation (update paths), OAuth masking, and schema validation before
//! it reaches the store; every outbound read passes output masking before it
//! reaches the caller. Operations fail fast: a failed step persists nothing.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{DestinationApiError, Result};
use crate::ids::IdGenerator;
use crate::models::{
    DestinationCloneOverrides, DestinationCreate, DestinationRead, DestinationReadList,
    DestinationSearch, DestinationUpdate,
};
use crate::presentation::IconPresentation;
use crate::services::configuration_update::ConfigurationMerger;
use crate::services::spec_resolver::{ResolvedSpecification, SpecResolver};
use crate::store::{
    DestinationConnection, DestinationDefinition, DestinationStore, VersionCatalog,
};
use crate::validation::SchemaValidator;
use wharf_connector::oauth::OAuthParamsMasker;
use wharf_connector::secrets::{SecretsProcessor, UnknownFieldPolicy};

/// Service for destination configuration lifecycle operations.
///
/// Holds no cross-request mutable state; each operation is a self-contained
/// request handler over the shared collaborators.
pub struct DestinationService {
    store: Arc<dyn DestinationStore>,
    resolver: SpecResolver,
    validator: SchemaValidator,
    secrets: SecretsProcessor,
    oauth: OAuthParamsMasker,
    merger: ConfigurationMerger,
    ids: Arc<dyn IdGenerator>,
    presentation: Arc<dyn IconPresentation>,
}

impl DestinationService {
    /// Create a new destination service.
    pub fn new(
        store: Arc<dyn DestinationStore>,
        catalog: Arc<dyn VersionCatalog>,
        ids: Arc<dyn IdGenerator>,
        presentation: Arc<dyn IconPresentation>,
    ) -> Self {
        let secrets = SecretsProcessor::new();
        Self {
            store,
            resolver: SpecResolver::new(catalog),
            validator: SchemaValidator::new(),
            secrets,
            oauth: OAuthParamsMasker::new(),
            merger: ConfigurationMerger::new(secrets),
            ids,
            presentation,
        }
    }

    /// Set the policy for reconciling fields the schema cannot classify.
    #[must_use]
    pub fn with_unknown_field_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.secrets = SecretsProcessor::with_policy(policy);
        self.merger = ConfigurationMerger::new(self.secrets);
        self
    }

    /// Create a destination configuration.
    ///
    /// The persisted document retains plaintext secrets; the response never
    /// does.
    pub async fn create_destination(&self, request: DestinationCreate) -> Result<DestinationRead> {
        request
            .validate()
            .map_err(|e| DestinationApiError::InvalidRequest(e.to_string()))?;

        let definition = self.load_definition(request.definition_id).await?;
        let resolved = self
            .resolver
            .resolve(&definition, request.workspace_id, None)
            .await?;

        let destination_id = self.ids.next();
        let configuration = self.oauth.mask_oauth_params(
            definition.definition_id,
            request.workspace_id,
            &request.configuration,
            &resolved.secret_fields,
        );

        self.validator.ensure(
            &resolved.version.spec.connection_specification,
            &configuration,
        )?;

        let now = Utc::now();
        let record = DestinationConnection {
            destination_id,
            workspace_id: request.workspace_id,
            definition_id: request.definition_id,
            name: request.name,
            configuration,
            tombstone: false,
            pinned_version_id: None,
            created_at: now,
            updated_at: now,
        };

        self.store
            .upsert(&record)
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?;

        info!(
            destination_id = %destination_id,
            workspace_id = %record.workspace_id,
            definition_id = %record.definition_id,
            "Created destination"
        );

        Ok(self.to_read(record, &definition, &resolved))
    }

    /// Get a destination by id, output-masked.
    pub async fn get_destination(&self, destination_id: Uuid) -> Result<DestinationRead> {
        let record = self.load_active(destination_id).await?;
        self.assemble(record).await
    }

    /// List a workspace's destinations, output-masked.
    pub async fn list_destinations(&self, workspace_id: Uuid) -> Result<DestinationReadList> {
        let records = self
            .store
            .list_by_workspace(workspace_id)
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?;

        self.assemble_list(records).await
    }

    /// Search destinations by exact equality on the provided criteria.
    ///
    /// Criteria are ANDed; a search providing no criteria matches nothing.
    pub async fn search_destinations(
        &self,
        search: DestinationSearch,
    ) -> Result<DestinationReadList> {
        if search.is_empty() {
            return Ok(DestinationReadList {
                destinations: Vec::new(),
            });
        }

        let records = self
            .store
            .list_all()
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?
            .into_iter()
            .filter(|record| search.matches(record))
            .collect();

        self.assemble_list(records).await
    }

    /// Update a destination in place.
    pub async fn update_destination(
        &self,
        destination_id: Uuid,
        update: DestinationUpdate,
    ) -> Result<DestinationRead> {
        update
            .validate()
            .map_err(|e| DestinationApiError::InvalidRequest(e.to_string()))?;

        let existing = self.load_active(destination_id).await?;
        let definition = self.load_definition(existing.definition_id).await?;
        let resolved = self
            .resolver
            .resolve(
                &definition,
                existing.workspace_id,
                existing.pinned_version_id,
            )
            .await?;

        let mut merged = self.merger.merge(
            &existing,
            update.name,
            update.configuration.as_ref(),
            &resolved.secret_fields,
        )?;

        merged.configuration = self.oauth.mask_oauth_params(
            definition.definition_id,
            merged.workspace_id,
            &merged.configuration,
            &resolved.secret_fields,
        );

        self.validator.ensure(
            &resolved.version.spec.connection_specification,
            &merged.configuration,
        )?;

        self.store
            .upsert(&merged)
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?;

        info!(destination_id = %destination_id, "Updated destination");

        Ok(self.to_read(merged, &definition, &resolved))
    }

    /// Clone a destination into a new record.
    ///
    /// The source is read through the privileged path including plaintext
    /// secrets, so an override touching only non-secret fields leaves every
    /// secret at the source's values. The target is persisted in a single
    /// write after full preparation.
    pub async fn clone_destination(
        &self,
        source_destination_id: Uuid,
        overrides: Option<DestinationCloneOverrides>,
    ) -> Result<DestinationRead> {
        let overrides = overrides.unwrap_or_default();
        overrides
            .validate()
            .map_err(|e| DestinationApiError::InvalidRequest(e.to_string()))?;

        let source = self
            .store
            .get_destination_with_secrets(source_destination_id)
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?
            .filter(|record| !record.tombstone)
            .ok_or(DestinationApiError::DestinationNotFound(
                source_destination_id,
            ))?;

        let definition = self.load_definition(source.definition_id).await?;
        let resolved = self
            .resolver
            .resolve(&definition, source.workspace_id, None)
            .await?;

        let configuration = match overrides.configuration {
            Some(incoming) => {
                self.secrets
                    .reconcile_secrets(&resolved.secret_fields, &source.configuration, &incoming)?
            }
            None => source.configuration.clone(),
        };

        self.validator.ensure(
            &resolved.version.spec.connection_specification,
            &configuration,
        )?;

        let now = Utc::now();
        let record = DestinationConnection {
            destination_id: self.ids.next(),
            workspace_id: source.workspace_id,
            definition_id: source.definition_id,
            name: overrides.name.unwrap_or_else(|| source.name.clone()),
            configuration,
            tombstone: false,
            pinned_version_id: None,
            created_at: now,
            updated_at: now,
        };

        self.store
            .upsert(&record)
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?;

        info!(
            source_destination_id = %source_destination_id,
            destination_id = %record.destination_id,
            "Cloned destination"
        );

        Ok(self.to_read(record, &definition, &resolved))
    }

    /// Pin a destination to its definition's current global default version.
    ///
    /// The configuration document and its secrets are untouched.
    pub async fn upgrade_destination_version(&self, destination_id: Uuid) -> Result<()> {
        let record = self.load_active(destination_id).await?;
        let definition = self.load_definition(record.definition_id).await?;

        self.resolver
            .resolve(&definition, record.workspace_id, Some(definition.default_version_id))
            .await?;

        self.store
            .set_version_override(destination_id, definition.default_version_id)
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?;

        info!(
            destination_id = %destination_id,
            version_id = %definition.default_version_id,
            "Upgraded destination to the definition default version"
        );

        Ok(())
    }

    /// Tombstone a destination.
    pub async fn delete_destination(&self, destination_id: Uuid) -> Result<()> {
        let mut record = self.load_active(destination_id).await?;
        record.tombstone = true;
        record.updated_at = Utc::now();

        self.store
            .upsert(&record)
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?;

        info!(destination_id = %destination_id, "Tombstoned destination");

        Ok(())
    }

    async fn load_active(&self, destination_id: Uuid) -> Result<DestinationConnection> {
        self.store
            .get_destination(destination_id)
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?
            .filter(|record| !record.tombstone)
            .ok_or(DestinationApiError::DestinationNotFound(destination_id))
    }

    async fn load_definition(&self, definition_id: Uuid) -> Result<DestinationDefinition> {
        self.store
            .get_definition(definition_id)
            .await
            .map_err(|e| DestinationApiError::upstream("destination store", e))?
            .ok_or(DestinationApiError::DefinitionNotFound(definition_id))
    }

    async fn assemble(&self, record: DestinationConnection) -> Result<DestinationRead> {
        let definition = self.load_definition(record.definition_id).await?;
        let resolved = self
            .resolver
            .resolve(&definition, record.workspace_id, record.pinned_version_id)
            .await?;
        Ok(self.to_read(record, &definition, &resolved))
    }

    async fn assemble_list(
        &self,
        records: Vec<DestinationConnection>,
    ) -> Result<DestinationReadList> {
        let mut destinations = Vec::with_capacity(records.len());
        for record in records {
            if record.tombstone {
                continue;
            }
            destinations.push(self.assemble(record).await?);
        }
        Ok(DestinationReadList { destinations })
    }

    fn to_read(
        &self,
        record: DestinationConnection,
        definition: &DestinationDefinition,
        resolved: &ResolvedSpecification,
    ) -> DestinationRead {
        let configuration = self
            .secrets
            .mask_for_output(&resolved.secret_fields, &record.configuration);

        DestinationRead {
            destination_id: record.destination_id,
            workspace_id: record.workspace_id,
            definition_id: record.definition_id,
            name: record.name,
            destination_name: definition.name.clone(),
            configuration,
            icon: self
                .presentation
                .render_icon(definition, record.workspace_id),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
