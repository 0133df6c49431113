//! Destination API services.

pub mod configuration_update;
pub mod destination_service;
pub mod spec_resolver;

pub use configuration_update::ConfigurationMerger;
pub use destination_service::DestinationService;
pub use spec_resolver::{ResolvedSpecification, SpecResolver};
