//! Authentication middleware
//!
//! Extractors that resolve the request's `Principal` from the JWT bearer
//! token, plus role-scoped wrappers for endpoints with a fixed role.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use crate::auth::{get_role_from_claims, get_user_id_from_claims, verify_token, AuthService, JwtError};
use crate::error::ApiError;
use crate::models::{Principal, Role};

/// Authenticated principal extracted from the JWT token
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(AuthenticatedUser(principal): AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, user {}", principal.id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::Unauthorized(
                        "Authorization header with Bearer token required".to_string(),
                    )
                })?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        // Verify the token
        let claims = verify_token(bearer.token(), auth_service.jwt_secret()).map_err(|e| {
            let message = match e {
                JwtError::TokenExpired => "Token has expired",
                _ => "Invalid token",
            };
            ApiError::Unauthorized(message.to_string())
        })?;

        if claims.token_type != "access" {
            return Err(ApiError::Unauthorized("Expected access token".to_string()));
        }

        let user_id = get_user_id_from_claims(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;
        let role = get_role_from_claims(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid role in token".to_string()))?;

        Ok(AuthenticatedUser(Principal::new(user_id, role)))
    }
}

/// Extractor requiring the host role
#[derive(Debug, Clone, Copy)]
pub struct HostUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for HostUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(principal) =
            AuthenticatedUser::from_request_parts(parts, state).await?;

        if principal.role != Role::Host {
            return Err(ApiError::Forbidden("Host access required".to_string()));
        }

        Ok(HostUser(principal))
    }
}

/// Extractor requiring the guest role
#[derive(Debug, Clone, Copy)]
pub struct GuestUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for GuestUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(principal) =
            AuthenticatedUser::from_request_parts(parts, state).await?;

        if principal.role != Role::Guest {
            return Err(ApiError::Forbidden("Guest access required".to_string()));
        }

        Ok(GuestUser(principal))
    }
}
