//! Order handlers: open a table, run its timer, adjust F&B, take payment

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

use crate::api::dto::{
    error_response, ApiError, ApiResponse, CreateOrderRequest, ExtendOrderRequest,
    ListOrdersQuery, OrderDto, PayOrderRequest, ReplaceItemsRequest, StopOrderRequest,
};
use crate::api::extract::ValidatedJson;
use crate::application::OrderService;
use crate::auth::AuthenticatedUser;

#[derive(Clone)]
pub struct OrderHandlerState {
    pub orders: Arc<OrderService>,
}

type OrderResult = Result<Json<ApiResponse<OrderDto>>, ApiError<OrderDto>>;

fn ok(details: crate::domain::OrderDetails) -> OrderResult {
    Ok(Json(ApiResponse::success(details.into())))
}

/// Orders opened on one venue-local day, newest first
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Orders of the day", body = ApiResponse<Vec<OrderDto>>)
    )
)]
pub async fn list_orders(
    State(state): State<OrderHandlerState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ApiResponse<Vec<OrderDto>>>, ApiError<Vec<OrderDto>>> {
    let orders = state
        .orders
        .list_by_day(query.date.as_deref(), Utc::now())
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        orders.into_iter().map(OrderDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with bill", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_order(
    State(state): State<OrderHandlerState>,
    Path(id): Path<String>,
) -> OrderResult {
    ok(state.orders.get(&id).await.map_err(error_response)?)
}

/// Open a table: reserve it, take the F&B stock and switch the lamp on
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderDto>),
        (status = 404, description = "Table or menu item not found"),
        (status = 409, description = "Table is in use or stock is short"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_order(
    State(state): State<OrderHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDto>>), ApiError<OrderDto>> {
    let details = state
        .orders
        .create(request.into(), Some(user.user_id))
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(details.into()))))
}

/// Stop the timer early and switch the lamp off
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/stop",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    request_body(content = StopOrderRequest, description = "Optional stop time"),
    responses(
        (status = 200, description = "Timer stopped", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Order is not running")
    )
)]
pub async fn stop_order(
    State(state): State<OrderHandlerState>,
    Path(id): Path<String>,
    body: Option<ValidatedJson<StopOrderRequest>>,
) -> OrderResult {
    let stop_at = body.and_then(|ValidatedJson(req)| req.stop_at);
    ok(state.orders.stop(&id, stop_at).await.map_err(error_response)?)
}

/// Release a table whose time is up. Repeating it is harmless
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/expire",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Session ended", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn expire_order(
    State(state): State<OrderHandlerState>,
    Path(id): Path<String>,
) -> OrderResult {
    ok(state.orders.expire(&id).await.map_err(error_response)?)
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/extend",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    request_body = ExtendOrderRequest,
    responses(
        (status = 200, description = "Time added", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Order is not running")
    )
)]
pub async fn extend_order(
    State(state): State<OrderHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ExtendOrderRequest>,
) -> OrderResult {
    ok(state
        .orders
        .extend(&id, request.hours)
        .await
        .map_err(error_response)?)
}

/// Replace every F&B line of an unpaid order
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/items",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    request_body = ReplaceItemsRequest,
    responses(
        (status = 200, description = "Lines replaced", body = ApiResponse<OrderDto>),
        (status = 404, description = "Order or menu item not found"),
        (status = 409, description = "Order already paid or stock is short")
    )
)]
pub async fn replace_order_items(
    State(state): State<OrderHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ReplaceItemsRequest>,
) -> OrderResult {
    ok(state
        .orders
        .replace_items(&id, &request.into_lines())
        .await
        .map_err(error_response)?)
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/pay",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    request_body(content = PayOrderRequest, description = "Optional cashier note"),
    responses(
        (status = 200, description = "Order paid", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Order already paid")
    )
)]
pub async fn pay_order(
    State(state): State<OrderHandlerState>,
    Path(id): Path<String>,
    body: Option<ValidatedJson<PayOrderRequest>>,
) -> OrderResult {
    let note = body.and_then(|ValidatedJson(req)| req.note);
    ok(state.orders.pay(&id, note).await.map_err(error_response)?)
}
