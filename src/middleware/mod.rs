//! Middleware for the Rentora API
//!
//! This module provides middleware for request tracing, security headers,
//! and authentication extractors.

pub mod auth;
mod security;
mod tracing;

pub use auth::{AuthenticatedUser, GuestUser, HostUser};
pub use security::security_headers;
pub use tracing::request_tracing;
