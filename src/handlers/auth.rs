//! Authentication HTTP handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{AuthTokensResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::state::AppState;

/// POST /auth/register - Create an account and issue tokens
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthTokensResponse>, ApiError> {
    req.validate()?;
    let tokens = state.auth_service.register(req).await?;
    Ok(Json(tokens))
}

/// POST /auth/login - Verify credentials and issue tokens
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthTokensResponse>, ApiError> {
    req.validate()?;
    let tokens = state.auth_service.login(req).await?;
    Ok(Json(tokens))
}

/// GET /auth/me - Get current authenticated user
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth_service.get_user(principal.id).await?;
    Ok(Json(user))
}
