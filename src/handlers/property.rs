//! Property catalog HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{AuthenticatedUser, HostUser};
use crate::models::{CreatePropertyRequest, Property, PropertyFilter, UpdatePropertyRequest};
use crate::state::AppState;

/// GET /api/properties - Search all listings (any authenticated principal)
pub async fn search_properties(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let properties = state.catalog.search(&filter).await?;
    Ok(Json(properties))
}

/// GET /api/properties/mine - Listings owned by the calling host
pub async fn list_my_properties(
    State(state): State<AppState>,
    HostUser(principal): HostUser,
) -> Result<Json<Vec<Property>>, ApiError> {
    let properties = state.catalog.list_by_owner(&principal).await?;
    Ok(Json(properties))
}

/// GET /api/properties/:id - Fetch a single listing
pub async fn get_property(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Property>, ApiError> {
    let property = state.catalog.get(id).await?;
    Ok(Json(property))
}

/// POST /api/properties - Create a listing (host only)
pub async fn create_property(
    State(state): State<AppState>,
    HostUser(principal): HostUser,
    Json(req): Json<CreatePropertyRequest>,
) -> Result<Json<Property>, ApiError> {
    let property = state.catalog.create(&principal, req).await?;
    Ok(Json(property))
}

/// PUT /api/properties/:id - Patch a listing (owner or admin)
pub async fn update_property(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdatePropertyRequest>,
) -> Result<Json<Property>, ApiError> {
    let property = state.catalog.update(&principal, id, patch).await?;
    Ok(Json(property))
}

/// DELETE /api/properties/:id - Delete a listing (owner or admin)
pub async fn delete_property(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
