//! Property route definitions

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::property;
use crate::state::AppState;

pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/api/properties", get(property::search_properties))
        .route("/api/properties", post(property::create_property))
        .route("/api/properties/mine", get(property::list_my_properties))
        .route("/api/properties/:id", get(property::get_property))
        .route("/api/properties/:id", put(property::update_property))
        .route("/api/properties/:id", delete(property::delete_property))
}
