//! Request and response models for the destination API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::store::DestinationConnection;

/// Request to create a new destination.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationCreate {
    /// Destination display name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Owning workspace.
    pub workspace_id: Uuid,

    /// Destination definition this configuration is for.
    pub definition_id: Uuid,

    /// Configuration document (must conform to the resolved specification).
    pub configuration: serde_json::Value,
}

/// Request to update a destination. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// Replacement configuration document. Secret fields holding the
    /// placeholder are carried forward from the stored document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
}

/// Overrides applied when cloning a destination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationCloneOverrides {
    /// Name for the clone; defaults to the source name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// Partial configuration for the clone, reconciled against the source's
    /// stored document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
}

/// Exact-match search criteria. Provided criteria are ANDed; providing none
/// matches nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DestinationSearch {
    /// Match on display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Match on owning workspace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<Uuid>,

    /// Match on destination definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_id: Option<Uuid>,
}

impl DestinationSearch {
    /// Whether no criteria were provided at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.workspace_id.is_none() && self.definition_id.is_none()
    }

    /// Whether a record satisfies every provided criterion.
    #[must_use]
    pub fn matches(&self, record: &DestinationConnection) -> bool {
        if self.is_empty() {
            return false;
        }
        self.name.as_ref().is_none_or(|name| *name == record.name)
            && self
                .workspace_id
                .is_none_or(|workspace_id| workspace_id == record.workspace_id)
            && self
                .definition_id
                .is_none_or(|definition_id| definition_id == record.definition_id)
    }
}

/// Query parameters for listing destinations.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct ListDestinationsQuery {
    /// Workspace whose destinations to list.
    pub workspace_id: Uuid,
}

/// Response for a single destination. The configuration document is always
/// output-masked; plaintext secrets never appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DestinationRead {
    /// Destination ID.
    pub destination_id: Uuid,

    /// Owning workspace.
    pub workspace_id: Uuid,

    /// Destination definition.
    pub definition_id: Uuid,

    /// Display name of this configuration.
    pub name: String,

    /// Display name of the destination definition.
    pub destination_name: String,

    /// Masked configuration document.
    pub configuration: serde_json::Value,

    /// Icon, rendered per the active presentation decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Response for destination listings and searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DestinationReadList {
    /// The matching destinations.
    pub destinations: Vec<DestinationRead>,
}
