//! Shared fixtures for destination lifecycle tests.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use wharf_api_destinations::{
    DefinitionVersion, DestinationConnection, DestinationCreate, DestinationDefinition,
    DestinationService, DestinationStore, FixedIds, IconUrlPresentation, MemoryDestinationStore,
    MemoryVersionCatalog, RandomIds,
};
use wharf_connector::spec::ConnectorSpecification;

pub const ICON_URL: &str = "https://assets.wharf.dev/icons/warehouse.svg";

/// A wired-up service over in-memory collaborators, with the handles the
/// tests need to inspect persisted state and publish versions.
pub struct Fixture {
    pub store: Arc<MemoryDestinationStore>,
    pub catalog: Arc<MemoryVersionCatalog>,
    pub service: DestinationService,
    pub workspace_id: Uuid,
    pub definition_id: Uuid,
    pub default_version_id: Uuid,
}

/// Connection schema used across the lifecycle tests: one plain setting, one
/// plain secret, one OAuth-sourced secret.
pub fn connection_schema() -> Value {
    json!({
        "type": "object",
        "required": ["host", "api_key"],
        "properties": {
            "host": { "type": "string" },
            "api_key": { "type": "string", "wharf_secret": true },
            "credentials": {
                "type": "object",
                "properties": {
                    "access_token": {
                        "type": "string",
                        "wharf_secret": true,
                        "wharf_oauth": true
                    }
                }
            }
        }
    })
}

/// A conforming configuration document with plaintext secrets.
pub fn base_configuration() -> Value {
    json!({
        "host": "warehouse.internal",
        "api_key": "123-abc",
        "credentials": { "access_token": "ya29.consent-token" }
    })
}

pub async fn fixture() -> Fixture {
    fixture_with_ids(Vec::new()).await
}

/// Build a fixture whose id generator yields `ids` first, then random ids.
pub async fn fixture_with_ids(ids: Vec<Uuid>) -> Fixture {
    let store = Arc::new(MemoryDestinationStore::new());
    let catalog = Arc::new(MemoryVersionCatalog::new());

    let definition_id = Uuid::new_v4();
    let default_version_id = Uuid::new_v4();
    store
        .insert_definition(DestinationDefinition {
            definition_id,
            name: "warehouse".to_string(),
            icon_url: Some(ICON_URL.to_string()),
            default_version_id,
        })
        .await;
    catalog
        .insert_version(DefinitionVersion {
            version_id: default_version_id,
            definition_id,
            spec: ConnectorSpecification::new(connection_schema(), "1.0.0")
                .with_documentation_url("https://docs.wharf.dev/destinations/warehouse"),
        })
        .await;

    let service = if ids.is_empty() {
        DestinationService::new(
            store.clone(),
            catalog.clone(),
            Arc::new(RandomIds),
            Arc::new(IconUrlPresentation),
        )
    } else {
        DestinationService::new(
            store.clone(),
            catalog.clone(),
            Arc::new(FixedIds::new(ids)),
            Arc::new(IconUrlPresentation),
        )
    };

    Fixture {
        store,
        catalog,
        service,
        workspace_id: Uuid::new_v4(),
        definition_id,
        default_version_id,
    }
}

impl Fixture {
    /// Fetch the persisted record directly from the store.
    pub async fn store_record(&self, destination_id: Uuid) -> DestinationConnection {
        self.store
            .get_destination(destination_id)
            .await
            .expect("store read")
            .expect("record present")
    }

    /// A create request for the fixture's workspace and definition.
    pub fn create_request(&self) -> DestinationCreate {
        DestinationCreate {
            name: "analytics warehouse".to_string(),
            workspace_id: self.workspace_id,
            definition_id: self.definition_id,
            configuration: base_configuration(),
        }
    }

    /// Publish a new version and make it the definition's global default.
    pub async fn publish_default_version(&self, version_tag: &str) -> Uuid {
        let version_id = Uuid::new_v4();
        self.catalog
            .insert_version(DefinitionVersion {
                version_id,
                definition_id: self.definition_id,
                spec: ConnectorSpecification::new(connection_schema(), version_tag),
            })
            .await;
        self.store
            .insert_definition(DestinationDefinition {
                definition_id: self.definition_id,
                name: "warehouse".to_string(),
                icon_url: Some(ICON_URL.to_string()),
                default_version_id: version_id,
            })
            .await;
        version_id
    }
}
