// handlers/protected/verification_areas.rs - GET/PUT /verification-areas

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;

use crate::app::AppState;
use crate::database::models::{normalize_areas, VerificationAreasDocument};
use crate::database::service;
use crate::middleware::{ApiResponse, ApiResult};

pub async fn get(State(state): State<AppState>) -> ApiResult<VerificationAreasDocument> {
    let items = service::fetch_verification_areas(&state.pool).await?;
    Ok(ApiResponse::success(VerificationAreasDocument { items }))
}

/// PUT /verification-areas - replace the whole taxonomy, echo the normalized copy
pub async fn put(
    State(state): State<AppState>,
    payload: Result<Json<VerificationAreasDocument>, JsonRejection>,
) -> ApiResult<VerificationAreasDocument> {
    let Json(document) = payload?;
    let items = normalize_areas(document.items);
    service::replace_verification_areas(&state.pool, &items).await?;
    Ok(ApiResponse::success(VerificationAreasDocument { items }))
}
