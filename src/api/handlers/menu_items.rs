//! Food & beverage handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::dto::{
    error_response, ApiError, ApiResponse, EmptyData, MenuItemDto, MenuItemRequest,
};
use crate::api::extract::ValidatedJson;
use crate::application::MenuService;

#[derive(Clone)]
pub struct MenuHandlerState {
    pub menu: Arc<MenuService>,
}

fn to_dtos(items: Vec<crate::domain::MenuItem>) -> Vec<MenuItemDto> {
    items.into_iter().map(MenuItemDto::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/v1/menu-items",
    tag = "Menu",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every item, sold out and inactive included", body = ApiResponse<Vec<MenuItemDto>>)
    )
)]
pub async fn list_menu_items(
    State(state): State<MenuHandlerState>,
) -> Result<Json<ApiResponse<Vec<MenuItemDto>>>, ApiError<Vec<MenuItemDto>>> {
    let items = state.menu.list().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(to_dtos(items))))
}

/// Items the order form may offer
#[utoipa::path(
    get,
    path = "/api/v1/menu-items/available",
    tag = "Menu",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active items in stock", body = ApiResponse<Vec<MenuItemDto>>)
    )
)]
pub async fn available_menu_items(
    State(state): State<MenuHandlerState>,
) -> Result<Json<ApiResponse<Vec<MenuItemDto>>>, ApiError<Vec<MenuItemDto>>> {
    let items = state.menu.available().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(to_dtos(items))))
}

#[utoipa::path(
    get,
    path = "/api/v1/menu-items/{id}",
    tag = "Menu",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item", body = ApiResponse<MenuItemDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_menu_item(
    State(state): State<MenuHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MenuItemDto>>, ApiError<MenuItemDto>> {
    let item = state.menu.get(&id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(item.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/menu-items",
    tag = "Menu",
    security(("bearer_auth" = [])),
    request_body = MenuItemRequest,
    responses(
        (status = 201, description = "Item created", body = ApiResponse<MenuItemDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_menu_item(
    State(state): State<MenuHandlerState>,
    ValidatedJson(request): ValidatedJson<MenuItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MenuItemDto>>), ApiError<MenuItemDto>> {
    let input = request.into_input().map_err(error_response)?;
    let item = state.menu.create(input).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/menu-items/{id}",
    tag = "Menu",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Menu item ID")),
    request_body = MenuItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ApiResponse<MenuItemDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_menu_item(
    State(state): State<MenuHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<MenuItemRequest>,
) -> Result<Json<ApiResponse<MenuItemDto>>, ApiError<MenuItemDto>> {
    let input = request.into_input().map_err(error_response)?;
    let item = state.menu.update(&id, input).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(item.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/menu-items/{id}",
    tag = "Menu",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Item deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Item is used by orders")
    )
)]
pub async fn delete_menu_item(
    State(state): State<MenuHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError<EmptyData>> {
    state.menu.delete(&id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
