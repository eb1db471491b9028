// handlers/protected/inspections.rs - /inspections CRUD and DOCX export

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::api::{ActPayload, InspectionListResponse, InspectionResponse};
use crate::app::AppState;
use crate::database::{InspectionListParams, InspectionListQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{build_inspection_docx, DOCX_CONTENT_TYPE};

/// GET /inspections?page&page_size&year&ogrn
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<InspectionListParams>, QueryRejection>,
) -> ApiResult<InspectionListResponse> {
    let Query(params) = params?;
    let query = InspectionListQuery::from_params(&params, &state.config.api);

    let (items, total) = state.inspections.list(&query).await?;
    Ok(ApiResponse::success(InspectionListResponse {
        items,
        total,
        page: query.page,
        page_size: query.page_size,
    }))
}

/// GET /inspections/:id
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<InspectionResponse> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.inspections.fetch_by_id(id).await?))
}

/// POST /inspections - 201 with the stored act
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<ActPayload>, JsonRejection>,
) -> ApiResult<InspectionResponse> {
    let Json(payload) = payload?;
    let created = state.inspections.insert(&payload, &auth.principal.name).await?;
    Ok(ApiResponse::created(created))
}

/// PUT /inspections/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ActPayload>, JsonRejection>,
) -> ApiResult<InspectionResponse> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let updated = state.inspections.update(id, &payload, &auth.principal.name).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /inspections/:id - 204, or 404 when nothing was removed
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.inspections.delete(id).await?;
    Ok(ApiResponse::no_content())
}

/// GET /inspections/:id/export/docx
pub async fn export_docx(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let item = state.inspections.fetch_by_id(id).await?;
    let bytes = build_inspection_docx(&item)?;

    let disposition = format!("attachment; filename=\"inspection-{}.docx\"", item.id);
    Ok((
        [(CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()), (CONTENT_DISPOSITION, disposition)],
        bytes,
    )
        .into_response())
}
