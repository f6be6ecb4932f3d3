//! Dashboard HTTP handlers

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::KpiSnapshot;
use crate::state::AppState;

/// GET /api/dashboard/kpi - Summary statistics (admin only)
pub async fn get_kpi(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<KpiSnapshot>, ApiError> {
    let snapshot = state.kpi.compute_snapshot(&principal).await?;
    Ok(Json(snapshot))
}
