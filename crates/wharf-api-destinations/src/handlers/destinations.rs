//! HTTP handlers for destination lifecycle operations.
//!
//! Thin adapters over [`crate::services::DestinationService`]; no business
//! logic lives here.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    DestinationCloneOverrides, DestinationCreate, DestinationRead, DestinationReadList,
    DestinationSearch, DestinationUpdate, ListDestinationsQuery,
};
use crate::router::DestinationState;

/// Create a new destination.
#[utoipa::path(
    post,
    path = "/destinations",
    tag = "Destinations",
    request_body = DestinationCreate,
    responses(
        (status = 201, description = "Destination created", body = DestinationRead),
        (status = 400, description = "Invalid request or configuration"),
        (status = 404, description = "Definition or version not found")
    )
)]
pub async fn create_destination(
    State(state): State<DestinationState>,
    Json(request): Json<DestinationCreate>,
) -> Result<(StatusCode, Json<DestinationRead>)> {
    let destination = state.destination_service.create_destination(request).await?;
    Ok((StatusCode::CREATED, Json(destination)))
}

/// Get a destination by ID.
#[utoipa::path(
    get,
    path = "/destinations/{id}",
    tag = "Destinations",
    params(("id" = Uuid, Path, description = "Destination ID")),
    responses(
        (status = 200, description = "Destination details", body = DestinationRead),
        (status = 404, description = "Destination not found")
    )
)]
pub async fn get_destination(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DestinationRead>> {
    let destination = state.destination_service.get_destination(id).await?;
    Ok(Json(destination))
}

/// List destinations for a workspace.
#[utoipa::path(
    get,
    path = "/destinations",
    tag = "Destinations",
    params(ListDestinationsQuery),
    responses(
        (status = 200, description = "Destinations in the workspace", body = DestinationReadList)
    )
)]
pub async fn list_destinations(
    State(state): State<DestinationState>,
    Query(query): Query<ListDestinationsQuery>,
) -> Result<Json<DestinationReadList>> {
    let destinations = state
        .destination_service
        .list_destinations(query.workspace_id)
        .await?;
    Ok(Json(destinations))
}

/// Search destinations by exact-match criteria.
#[utoipa::path(
    post,
    path = "/destinations/search",
    tag = "Destinations",
    request_body = DestinationSearch,
    responses(
        (status = 200, description = "Matching destinations", body = DestinationReadList)
    )
)]
pub async fn search_destinations(
    State(state): State<DestinationState>,
    Json(search): Json<DestinationSearch>,
) -> Result<Json<DestinationReadList>> {
    let destinations = state.destination_service.search_destinations(search).await?;
    Ok(Json(destinations))
}

/// Update a destination.
#[utoipa::path(
    put,
    path = "/destinations/{id}",
    tag = "Destinations",
    params(("id" = Uuid, Path, description = "Destination ID")),
    request_body = DestinationUpdate,
    responses(
        (status = 200, description = "Updated destination", body = DestinationRead),
        (status = 400, description = "Invalid request or configuration"),
        (status = 404, description = "Destination not found")
    )
)]
pub async fn update_destination(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
    Json(update): Json<DestinationUpdate>,
) -> Result<Json<DestinationRead>> {
    let destination = state
        .destination_service
        .update_destination(id, update)
        .await?;
    Ok(Json(destination))
}

/// Clone a destination into a new record.
#[utoipa::path(
    post,
    path = "/destinations/{id}/clone",
    tag = "Destinations",
    params(("id" = Uuid, Path, description = "Source destination ID")),
    request_body = DestinationCloneOverrides,
    responses(
        (status = 201, description = "Cloned destination", body = DestinationRead),
        (status = 404, description = "Source destination not found")
    )
)]
pub async fn clone_destination(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
    overrides: Option<Json<DestinationCloneOverrides>>,
) -> Result<(StatusCode, Json<DestinationRead>)> {
    let destination = state
        .destination_service
        .clone_destination(id, overrides.map(|Json(overrides)| overrides))
        .await?;
    Ok((StatusCode::CREATED, Json(destination)))
}

/// Pin a destination to its definition's current default version.
#[utoipa::path(
    post,
    path = "/destinations/{id}/upgrade_version",
    tag = "Destinations",
    params(("id" = Uuid, Path, description = "Destination ID")),
    responses(
        (status = 204, description = "Version pointer upgraded"),
        (status = 404, description = "Destination or version not found")
    )
)]
pub async fn upgrade_destination_version(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .destination_service
        .upgrade_destination_version(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Tombstone a destination.
#[utoipa::path(
    delete,
    path = "/destinations/{id}",
    tag = "Destinations",
    params(("id" = Uuid, Path, description = "Destination ID")),
    responses(
        (status = 204, description = "Destination tombstoned"),
        (status = 404, description = "Destination not found")
    )
)]
pub async fn delete_destination(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.destination_service.delete_destination(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
