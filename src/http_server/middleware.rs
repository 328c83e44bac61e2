//! Route guards
//!
//! `require_auth` attaches the [`Principal`] to the request; `require_roles`
//! must run after it. With `route_layer`, the layer added last runs first.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{authorize, AuthError, Principal, Role};

use super::errors::ApiResult;
use super::server::AppState;

/// Authenticate the bearer credential and attach the principal
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let principal = state.guard.authenticate(request.headers()).await?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Roles permitted on a route
#[derive(Debug, Clone)]
pub struct RequiredRoles(Arc<[Role]>);

impl RequiredRoles {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }
}

/// Reject principals whose role is not permitted
pub async fn require_roles(
    State(roles): State<RequiredRoles>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or(AuthError::Unauthenticated)?;
    authorize(principal, &roles.0)?;
    Ok(next.run(request).await)
}
