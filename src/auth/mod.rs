//! Authentication: JWT issue/verify and the account service

pub mod jwt;
pub mod service;

pub use jwt::{generate_access_token, get_role_from_claims, get_user_id_from_claims, verify_token, Claims, JwtError};
pub use service::{AuthError, AuthService};
