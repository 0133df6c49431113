//! Router configuration for the destination API.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::services::DestinationService;

/// Shared state for destination API handlers.
#[derive(Clone)]
pub struct DestinationState {
    pub destination_service: Arc<DestinationService>,
}

impl DestinationState {
    /// Create a new destination state.
    pub fn new(destination_service: Arc<DestinationService>) -> Self {
        Self {
            destination_service,
        }
    }
}

/// Create the destination API router.
///
/// # Example
///
/// ```ignore
/// use wharf_api_destinations::router::{destination_routes, DestinationState};
///
/// let state = DestinationState::new(Arc::new(destination_service));
/// let app = Router::new()
///     .nest("/api/v1/destinations", destination_routes(state));
/// ```
pub fn destination_routes(state: DestinationState) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::create_destination).get(handlers::list_destinations),
        )
        .route("/search", post(handlers::search_destinations))
        .route(
            "/:id",
            get(handlers::get_destination)
                .put(handlers::update_destination)
                .delete(handlers::delete_destination),
        )
        .route("/:id/clone", post(handlers::clone_destination))
        .route(
            "/:id/upgrade_version",
            post(handlers::upgrade_destination_version),
        )
        .with_state(state)
}
