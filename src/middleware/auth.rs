use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::cookie::read_cookie;
use crate::app::AppState;
use crate::error::ApiError;
use crate::types::Principal;

/// Authenticated session context inserted into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub principal: Principal,
    pub session_token: String,
}

/// Resolves the session cookie against the session store.
/// Rejects with 401 before the wrapped handler runs when the cookie is
/// missing or unknown.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_name = &state.config.security.session_cookie_name;
    let token = read_cookie(request.headers(), cookie_name)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let principal = match state.sessions.resolve(&token).await {
        Some(principal) => principal,
        None => {
            debug!("Rejected unknown session token");
            return Err(ApiError::unauthorized("Session is invalid or expired"));
        }
    };

    debug!("Resolved session for user {} ({})", principal.id, principal.role);
    request.extensions_mut().insert(AuthUser {
        principal,
        session_token: token,
    });

    Ok(next.run(request).await)
}

/// Second stage: only admins pass. Must run inside `session_auth_middleware`.
pub async fn require_admin_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !auth_user.principal.is_admin() {
        debug!("User {} denied admin route", auth_user.principal.id);
        return Err(ApiError::forbidden("Administrator access required"));
    }

    Ok(next.run(request).await)
}
