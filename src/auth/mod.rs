//! # Auth Module
//!
//! Bearer token authentication and role-based authorization.

pub mod errors;
pub mod guard;
pub mod jwt;
pub mod principal;

pub use errors::{AuthError, AuthResult};
pub use guard::{authorize, bearer_token, AccessGuard};
pub use jwt::{Claims, TokenConfig, TokenManager, DEFAULT_TOKEN_TTL_DAYS};
pub use principal::{Principal, PrincipalLookup, Role, StorePrincipalLookup};
