//! Authentication service
//!
//! Core business logic for email/password authentication and token issue.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    AuthTokensResponse, LoginRequest, RegisterRequest, User, UserResponse,
};
use crate::store::Store;

use super::jwt::{generate_access_token, JwtError};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Token error: {0}")]
    TokenError(String),
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        AuthError::TokenError(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AuthError::HashingFailed(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::EmailTaken => ApiError::Conflict(e.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            AuthError::UserNotFound => ApiError::NotFound(e.to_string()),
            AuthError::HashingFailed(_) | AuthError::TokenError(_) => {
                ApiError::InternalError(e.to_string())
            }
        }
    }
}

/// Authentication service
pub struct AuthService {
    store: Arc<Store>,
    jwt_secret: String,
    access_token_ttl_seconds: i64,
}

impl AuthService {
    pub fn new(store: Arc<Store>, jwt_secret: String, access_token_ttl_seconds: i64) -> Self {
        Self {
            store,
            jwt_secret,
            access_token_ttl_seconds,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Register a new account and issue tokens.
    ///
    /// Emails are stored lowercased and must be unique. The uniqueness check
    /// and the insert happen under one write lock.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthTokensResponse, AuthError> {
        let email = req.email.trim().to_lowercase();
        let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;

        let user = {
            let mut tables = self.store.write().await;
            if tables.user_by_email(&email).is_some() {
                return Err(AuthError::EmailTaken);
            }

            let user = User {
                id: Uuid::new_v4(),
                name: req.name.trim().to_string(),
                email,
                password_hash,
                role: req.role,
                created_at: Utc::now(),
            };
            tables.users.insert(user.id, user.clone());
            user
        };

        tracing::info!(user_id = %user.id, role = %user.role.as_str(), "User registered");
        self.issue_tokens(&user)
    }

    /// Verify credentials and issue tokens.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthTokensResponse, AuthError> {
        let user = {
            let tables = self.store.read().await;
            tables
                .user_by_email(&req.email)
                .cloned()
                .ok_or(AuthError::InvalidCredentials)?
        };

        let valid = bcrypt::verify(&req.password, &user.password_hash)?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue_tokens(&user)
    }

    /// Fetch the profile behind an authenticated principal
    pub async fn get_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let tables = self.store.read().await;
        tables
            .users
            .get(&user_id)
            .cloned()
            .map(UserResponse::from)
            .ok_or(AuthError::UserNotFound)
    }

    fn issue_tokens(&self, user: &User) -> Result<AuthTokensResponse, AuthError> {
        let jti = Uuid::new_v4().to_string();
        let access_token = generate_access_token(
            user,
            &jti,
            &self.jwt_secret,
            self.access_token_ttl_seconds,
        )?;

        Ok(AuthTokensResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl_seconds,
            user: UserResponse::from(user.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn service() -> AuthService {
        AuthService::new(Arc::new(Store::new()), "test-secret".to_string(), 900)
    }

    fn register_req(email: &str, role: Role) -> RegisterRequest {
        RegisterRequest {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service();
        let tokens = svc
            .register(register_req("ada@example.com", Role::Host))
            .await
            .unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.user.role, Role::Host);

        let tokens = svc
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
        assert!(!tokens.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let svc = service();
        svc.register(register_req("ada@example.com", Role::Guest))
            .await
            .unwrap();
        // Case-insensitive duplicate
        let err = svc
            .register(register_req("Ada@Example.com", Role::Guest))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_wrong_password_uniform_error() {
        let svc = service();
        svc.register(register_req("ada@example.com", Role::Guest))
            .await
            .unwrap();

        let wrong_password = svc
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = svc
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    }
}
