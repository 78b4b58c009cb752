//! Pool table handlers and the floor view

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::api::dto::{
    error_response, ApiError, ApiResponse, EmptyData, FloorSlotDto, PoolTableDto,
    PoolTableRequest,
};
use crate::api::extract::ValidatedJson;
use crate::application::PoolTableService;

#[derive(Clone)]
pub struct TableHandlerState {
    pub tables: Arc<PoolTableService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/tables",
    tag = "Tables",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All tables", body = ApiResponse<Vec<PoolTableDto>>)
    )
)]
pub async fn list_tables(
    State(state): State<TableHandlerState>,
) -> Result<Json<ApiResponse<Vec<PoolTableDto>>>, ApiError<Vec<PoolTableDto>>> {
    let tables = state.tables.list().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        tables.into_iter().map(PoolTableDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/{id}",
    tag = "Tables",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Table", body = ApiResponse<PoolTableDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_table(
    State(state): State<TableHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PoolTableDto>>, ApiError<PoolTableDto>> {
    let table = state.tables.get(&id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(table.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables",
    tag = "Tables",
    security(("bearer_auth" = [])),
    request_body = PoolTableRequest,
    responses(
        (status = 201, description = "Table created", body = ApiResponse<PoolTableDto>),
        (status = 409, description = "Device ID already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_table(
    State(state): State<TableHandlerState>,
    ValidatedJson(request): ValidatedJson<PoolTableRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PoolTableDto>>), ApiError<PoolTableDto>> {
    let input = request.into_input().map_err(error_response)?;
    let table = state.tables.create(input).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(table.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/tables/{id}",
    tag = "Tables",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Table ID")),
    request_body = PoolTableRequest,
    responses(
        (status = 200, description = "Table updated", body = ApiResponse<PoolTableDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Device ID taken or table is running")
    )
)]
pub async fn update_table(
    State(state): State<TableHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<PoolTableRequest>,
) -> Result<Json<ApiResponse<PoolTableDto>>, ApiError<PoolTableDto>> {
    let input = request.into_input().map_err(error_response)?;
    let table = state.tables.update(&id, input).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(table.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tables/{id}",
    tag = "Tables",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Table deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Table has a running order or past orders")
    )
)]
pub async fn delete_table(
    State(state): State<TableHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError<EmptyData>> {
    state.tables.delete(&id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Active tables with their running session and countdown
#[utoipa::path(
    get,
    path = "/api/v1/floor",
    tag = "Tables",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Floor view", body = ApiResponse<Vec<FloorSlotDto>>)
    )
)]
pub async fn floor(
    State(state): State<TableHandlerState>,
) -> Result<Json<ApiResponse<Vec<FloorSlotDto>>>, ApiError<Vec<FloorSlotDto>>> {
    let slots = state.tables.floor(Utc::now()).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        slots.into_iter().map(FloorSlotDto::from).collect(),
    )))
}
