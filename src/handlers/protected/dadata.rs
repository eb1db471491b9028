// handlers/protected/dadata.rs - POST /dadata/organization handler

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::dadata_service::{is_valid_ogrn, OrganizationInfo};

#[derive(Debug, Deserialize)]
pub struct OrganizationRequest {
    #[serde(default)]
    pub ogrn: String,
}

/// Validates the OGRN locally, then asks the registry
pub async fn organization(
    State(state): State<AppState>,
    payload: Result<Json<OrganizationRequest>, JsonRejection>,
) -> ApiResult<OrganizationInfo> {
    let Json(request) = payload?;
    let ogrn = request.ogrn.trim();
    if !is_valid_ogrn(ogrn) {
        return Err(ApiError::bad_request("OGRN must contain exactly 13 digits"));
    }

    let info = state.organization_lookup.find_by_ogrn(ogrn).await?;
    Ok(ApiResponse::success(info))
}
