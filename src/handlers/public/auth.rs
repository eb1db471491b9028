// handlers/public/auth.rs - POST /auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::AppState;
use crate::database::service;
use crate::error::ApiError;
use crate::middleware::session_cookie;
use crate::types::{Principal, Role};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: Principal,
}

/// POST /auth/login - check credentials, open a session, set the cookie
///
/// Unknown login and wrong password share one 401 message. A `no_access`
/// account with correct credentials gets 403.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    let user = match service::find_user_by_login(&state.pool, &request.login).await? {
        Some(user) if user.password_matches(&request.password) => user,
        _ => {
            warn!("Rejected login for {:?}", request.login);
            return Err(ApiError::unauthorized("Invalid login or password"));
        }
    };

    if user.role() == Role::NoAccess {
        warn!("Login denied for {} (no_access)", user.login);
        return Err(ApiError::forbidden("Access denied"));
    }

    let principal = user.into_principal();
    let token = state.sessions.create(principal.clone()).await?;
    info!("User {} ({}) logged in", principal.id, principal.login);

    let cookie = session_cookie(&state.config.security, &token);
    Ok(([(SET_COOKIE, cookie)], Json(LoginResponse { user: principal })).into_response())
}
