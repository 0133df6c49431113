//! Persistence records and collaborator contracts.
//!
//! Durability of destination records and definitions is owned by an external
//! collaborator; this module defines the records and the trait seams the
//! lifecycle manager consumes. In-memory implementations back the test
//! suite and make the crate runnable without wiring a real store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use wharf_connector::spec::ConnectorSpecification;

/// A destination configuration record.
///
/// The stored configuration document always holds real secret values;
/// masking happens only on the outward path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationConnection {
    /// Unique identifier.
    pub destination_id: Uuid,

    /// Owning workspace.
    pub workspace_id: Uuid,

    /// Destination definition this configuration is for.
    pub definition_id: Uuid,

    /// Display name.
    pub name: String,

    /// Configuration document, conformant to the resolved specification.
    pub configuration: serde_json::Value,

    /// Soft-delete marker; tombstoned records are excluded from normal reads.
    pub tombstone: bool,

    /// Version pinned to this record, overriding workspace and definition
    /// defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_version_id: Option<Uuid>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A destination connector type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationDefinition {
    /// Unique identifier.
    pub definition_id: Uuid,

    /// Display name (e.g. "warehouse").
    pub name: String,

    /// Icon reference for presentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    /// The definition's current global default version.
    pub default_version_id: Uuid,
}

/// A published release of a destination definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionVersion {
    /// Unique identifier.
    pub version_id: Uuid,

    /// Definition this version belongs to.
    pub definition_id: Uuid,

    /// The versioned connector specification.
    pub spec: ConnectorSpecification,
}

/// Error reported by persistence collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrent write was detected; the operation may be retried.
    #[error("concurrent write detected: {0}")]
    Conflict(String),

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durability contract for destination records and definitions.
#[async_trait]
pub trait DestinationStore: Send + Sync {
    /// Fetch a destination record by id.
    async fn get_destination(&self, destination_id: Uuid)
        -> StoreResult<Option<DestinationConnection>>;

    /// Fetch a destination record by id, including plaintext secret values.
    ///
    /// Privileged read path used by clone; callers must never let the result
    /// reach a response without output masking.
    async fn get_destination_with_secrets(
        &self,
        destination_id: Uuid,
    ) -> StoreResult<Option<DestinationConnection>>;

    /// List all destination records in a workspace, tombstoned included.
    async fn list_by_workspace(&self, workspace_id: Uuid)
        -> StoreResult<Vec<DestinationConnection>>;

    /// List every destination record, tombstoned included.
    async fn list_all(&self) -> StoreResult<Vec<DestinationConnection>>;

    /// Insert or overwrite a destination record.
    async fn upsert(&self, record: &DestinationConnection) -> StoreResult<()>;

    /// Pin a destination record to a specific definition version.
    async fn set_version_override(
        &self,
        destination_id: Uuid,
        version_id: Uuid,
    ) -> StoreResult<()>;

    /// Fetch a destination definition by id.
    async fn get_definition(&self, definition_id: Uuid)
        -> StoreResult<Option<DestinationDefinition>>;
}

/// Version-catalog contract consulted during specification resolution.
#[async_trait]
pub trait VersionCatalog: Send + Sync {
    /// Fetch a definition version by id.
    async fn get_version(&self, version_id: Uuid) -> StoreResult<Option<DefinitionVersion>>;

    /// Workspace-level version override for a definition, if one exists.
    async fn workspace_version_override(
        &self,
        definition_id: Uuid,
        workspace_id: Uuid,
    ) -> StoreResult<Option<Uuid>>;
}

/// In-memory destination store.
#[derive(Debug, Default)]
pub struct MemoryDestinationStore {
    destinations: RwLock<HashMap<Uuid, DestinationConnection>>,
    definitions: RwLock<HashMap<Uuid, DestinationDefinition>>,
}

impl MemoryDestinationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a destination definition.
    pub async fn insert_definition(&self, definition: DestinationDefinition) {
        self.definitions
            .write()
            .await
            .insert(definition.definition_id, definition);
    }
}

#[async_trait]
impl DestinationStore for MemoryDestinationStore {
    async fn get_destination(
        &self,
        destination_id: Uuid,
    ) -> StoreResult<Option<DestinationConnection>> {
        Ok(self.destinations.read().await.get(&destination_id).cloned())
    }

    async fn get_destination_with_secrets(
        &self,
        destination_id: Uuid,
    ) -> StoreResult<Option<DestinationConnection>> {
        // The in-memory store holds plaintext documents, so the privileged
        // read is the plain read.
        self.get_destination(destination_id).await
    }

    async fn list_by_workspace(
        &self,
        workspace_id: Uuid,
    ) -> StoreResult<Vec<DestinationConnection>> {
        let mut records: Vec<DestinationConnection> = self
            .destinations
            .read()
            .await
            .values()
            .filter(|record| record.workspace_id == workspace_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    async fn list_all(&self) -> StoreResult<Vec<DestinationConnection>> {
        let mut records: Vec<DestinationConnection> =
            self.destinations.read().await.values().cloned().collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    async fn upsert(&self, record: &DestinationConnection) -> StoreResult<()> {
        self.destinations
            .write()
            .await
            .insert(record.destination_id, record.clone());
        Ok(())
    }

    async fn set_version_override(
        &self,
        destination_id: Uuid,
        version_id: Uuid,
    ) -> StoreResult<()> {
        let mut destinations = self.destinations.write().await;
        let record = destinations.get_mut(&destination_id).ok_or_else(|| {
            StoreError::Backend(format!("unknown destination: {destination_id}"))
        })?;
        record.pinned_version_id = Some(version_id);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn get_definition(
        &self,
        definition_id: Uuid,
    ) -> StoreResult<Option<DestinationDefinition>> {
        Ok(self.definitions.read().await.get(&definition_id).cloned())
    }
}

/// In-memory version catalog.
#[derive(Debug, Default)]
pub struct MemoryVersionCatalog {
    versions: RwLock<HashMap<Uuid, DefinitionVersion>>,
    workspace_overrides: RwLock<HashMap<(Uuid, Uuid), Uuid>>,
}

impl MemoryVersionCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a definition version.
    pub async fn insert_version(&self, version: DefinitionVersion) {
        self.versions
            .write()
            .await
            .insert(version.version_id, version);
    }

    /// Set a workspace-level version override for a definition.
    pub async fn set_workspace_override(
        &self,
        definition_id: Uuid,
        workspace_id: Uuid,
        version_id: Uuid,
    ) {
        self.workspace_overrides
            .write()
            .await
            .insert((definition_id, workspace_id), version_id);
    }
}

#[async_trait]
impl VersionCatalog for MemoryVersionCatalog {
    async fn get_version(&self, version_id: Uuid) -> StoreResult<Option<DefinitionVersion>> {
        Ok(self.versions.read().await.get(&version_id).cloned())
    }

    async fn workspace_version_override(
        &self,
        definition_id: Uuid,
        workspace_id: Uuid,
    ) -> StoreResult<Option<Uuid>> {
        Ok(self
            .workspace_overrides
            .read()
            .await
            .get(&(definition_id, workspace_id))
            .copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(workspace_id: Uuid) -> DestinationConnection {
        DestinationConnection {
            destination_id: Uuid::new_v4(),
            workspace_id,
            definition_id: Uuid::new_v4(),
            name: "analytics warehouse".to_string(),
            configuration: json!({ "host": "h" }),
            tombstone: false,
            pinned_version_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_and_get_round_trip() {
        let store = MemoryDestinationStore::new();
        let destination = record(Uuid::new_v4());

        store.upsert(&destination).await.unwrap();
        let fetched = store
            .get_destination(destination.destination_id)
            .await
            .unwrap();

        assert_eq!(fetched, Some(destination));
    }

    #[tokio::test]
    async fn list_by_workspace_scopes_records() {
        let store = MemoryDestinationStore::new();
        let workspace_id = Uuid::new_v4();
        let mine = record(workspace_id);
        let other = record(Uuid::new_v4());
        store.upsert(&mine).await.unwrap();
        store.upsert(&other).await.unwrap();

        let listed = store.list_by_workspace(workspace_id).await.unwrap();

        assert_eq!(listed, vec![mine]);
    }

    #[tokio::test]
    async fn set_version_override_pins_the_record() {
        let store = MemoryDestinationStore::new();
        let destination = record(Uuid::new_v4());
        store.upsert(&destination).await.unwrap();

        let version_id = Uuid::new_v4();
        store
            .set_version_override(destination.destination_id, version_id)
            .await
            .unwrap();

        let fetched = store
            .get_destination(destination.destination_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.pinned_version_id, Some(version_id));
    }

    #[tokio::test]
    async fn set_version_override_on_unknown_record_is_a_backend_error() {
        let store = MemoryDestinationStore::new();

        let err = store
            .set_version_override(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn catalog_resolves_workspace_overrides() {
        let catalog = MemoryVersionCatalog::new();
        let definition_id = Uuid::new_v4();
        let workspace_id = Uuid::new_v4();
        let version_id = Uuid::new_v4();

        assert_eq!(
            catalog
                .workspace_version_override(definition_id, workspace_id)
                .await
                .unwrap(),
            None
        );

        catalog
            .set_workspace_override(definition_id, workspace_id, version_id)
            .await;

        assert_eq!(
            catalog
                .workspace_version_override(definition_id, workspace_id)
                .await
                .unwrap(),
            Some(version_id)
        );
    }
}
