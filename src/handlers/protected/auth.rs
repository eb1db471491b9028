// handlers/protected/auth.rs - POST /auth/logout, GET /auth/me handlers

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use tracing::info;

use crate::app::AppState;
use crate::middleware::{expired_session_cookie, AuthUser};
use crate::types::Principal;

/// POST /auth/logout - drop the current session and expire the cookie
pub async fn logout(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> Response {
    state.sessions.revoke(&auth.session_token).await;
    info!("User {} logged out", auth.principal.id);

    let cookie = expired_session_cookie(&state.config.security);
    (StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response()
}

/// GET /auth/me - the principal bound to the session
pub async fn me(Extension(auth): Extension<AuthUser>) -> Json<Principal> {
    Json(auth.principal)
}
