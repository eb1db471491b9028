// handlers/elevated/users.rs - /users administration

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::AppState;
use crate::database::models::UserView;
use crate::database::service::{self, NewUser};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

impl CreateUserRequest {
    /// Trims every field and requires name, login and password
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let user = NewUser {
            name: self.name.trim().to_string(),
            login: self.login.trim().to_string(),
            password: self.password.trim().to_string(),
            role: Role::normalize(&self.role),
        };
        if user.name.is_empty() || user.login.is_empty() || user.password.is_empty() {
            return Err(ApiError::bad_request("Name, login and password are required"));
        }
        Ok(user)
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: i32,
    pub role: Role,
}

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserView>> {
    let users = service::users(state.pool.clone()).select_all().await?;
    Ok(ApiResponse::success(users.into_iter().map(UserView::from).collect()))
}

/// POST /users - 201 with the new account, 409 on a taken login
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<UserView> {
    let Json(request) = payload?;
    let new_user = request.validate()?;
    let user = service::create_user(&state.pool, &new_user).await?;
    Ok(ApiResponse::created(UserView::from(user)))
}

/// DELETE /users/:id - also ends every session of that user
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    if id == auth.principal.id {
        return Err(ApiError::conflict("You cannot delete your own account"));
    }

    service::users(state.pool.clone()).delete_404(id).await?;
    let revoked = state.sessions.revoke_user(id).await;
    info!("Deleted user {} ({} sessions revoked)", id, revoked);
    Ok(ApiResponse::no_content())
}

/// PATCH /users/:id/role - live sessions pick up the new role
pub async fn update_role(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<RoleRequest>, JsonRejection>,
) -> ApiResult<RoleResponse> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let role = Role::normalize(&request.role);

    service::update_user_role(&state.pool, id, role).await?;
    state.sessions.update_role(id, role).await;
    Ok(ApiResponse::success(RoleResponse { id, role }))
}
