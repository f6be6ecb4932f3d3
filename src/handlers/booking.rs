//! Booking ledger HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{AuthenticatedUser, GuestUser, HostUser};
use crate::models::{Booking, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::state::AppState;

/// GET /api/bookings - The calling guest's bookings
pub async fn list_my_bookings(
    State(state): State<AppState>,
    GuestUser(principal): GuestUser,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.ledger.list_for_guest(&principal).await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/host - Bookings on the calling host's properties
pub async fn list_host_bookings(
    State(state): State<AppState>,
    HostUser(principal): HostUser,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.ledger.list_for_host(&principal).await?;
    Ok(Json(bookings))
}

/// POST /api/bookings - Book a property (guest only)
pub async fn create_booking(
    State(state): State<AppState>,
    GuestUser(principal): GuestUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.ledger.create(&principal, req).await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/:id - Drive the booking state machine
pub async fn update_booking_status(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.ledger.set_status(&principal, id, req.status).await?;
    Ok(Json(booking))
}
