// handlers/elevated/employees.rs - /employees directory

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::Employee;
use crate::database::service;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub name: String,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    let employees = service::employees(state.pool.clone()).select_all().await?;
    Ok(ApiResponse::success(employees))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> ApiResult<Employee> {
    let Json(request) = payload?;
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Employee name is required"));
    }
    let employee = service::create_employee(&state.pool, name).await?;
    Ok(ApiResponse::created(employee))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    service::employees(state.pool.clone()).delete_404(id).await?;
    Ok(ApiResponse::no_content())
}
