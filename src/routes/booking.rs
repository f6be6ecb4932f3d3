//! Booking route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::booking;
use crate::state::AppState;

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(booking::list_my_bookings))
        .route("/api/bookings", post(booking::create_booking))
        .route("/api/bookings/host", get(booking::list_host_bookings))
        .route("/api/bookings/:id", put(booking::update_booking_status))
}
