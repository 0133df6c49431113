//! # Destination API
//!
//! Lifecycle management for destination configurations in wharf.
//!
//! Destination configuration documents mix ordinary settings with secret
//! credential fields. Every operation here runs through the secret-aware
//! pipeline from [`wharf_connector`]: responses are always output-masked,
//! partial updates reconcile placeholder secrets from the stored document,
//! OAuth-sourced values are masked on the write path, and the governing
//! specification version is resolved per record/workspace before anything is
//! validated or persisted.
//!
//! ## Endpoints
//!
//! - `POST /destinations` - Create a destination
//! - `GET /destinations?workspace_id=` - List a workspace's destinations
//! - `POST /destinations/search` - Search by exact-match criteria
//! - `GET /destinations/{id}` - Get destination details
//! - `PUT /destinations/{id}` - Update a destination
//! - `DELETE /destinations/{id}` - Tombstone a destination
//! - `POST /destinations/{id}/clone` - Clone into a new record
//! - `POST /destinations/{id}/upgrade_version` - Pin to the definition default
//!
//! ## Example
//!
//! ```ignore
//! use wharf_api_destinations::router;
//!
//! let app = Router::new()
//!     .nest("/api/v1/destinations", router::destination_routes(state));
//! ```

pub mod error;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod presentation;
pub mod router;
pub mod services;
pub mod store;
pub mod validation;

// Re-export for convenience
pub use error::{DestinationApiError, Result};
pub use ids::{FixedIds, IdGenerator, RandomIds};
pub use models::{
    DestinationCloneOverrides, DestinationCreate, DestinationRead, DestinationReadList,
    DestinationSearch, DestinationUpdate, ListDestinationsQuery,
};
pub use presentation::{IconPresentation, IconUrlPresentation};
pub use router::{destination_routes, DestinationState};
pub use services::{ConfigurationMerger, DestinationService, ResolvedSpecification, SpecResolver};
pub use store::{
    DefinitionVersion, DestinationConnection, DestinationDefinition, DestinationStore,
    MemoryDestinationStore, MemoryVersionCatalog, StoreError, StoreResult, VersionCatalog,
};
pub use validation::SchemaValidator;
