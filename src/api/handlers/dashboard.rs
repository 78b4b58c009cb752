//! Admin revenue dashboard handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::api::dto::{
    error_response, ApiError, ApiResponse, MonthlySummaryDto, RangeQuery, RangeReportDto,
};
use crate::application::DashboardService;

#[derive(Clone)]
pub struct DashboardHandlerState {
    pub dashboard: Arc<DashboardService>,
}

/// Paid and unpaid revenue per month, oldest month first
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/summary",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Monthly revenue", body = ApiResponse<Vec<MonthlySummaryDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn monthly_summary(
    State(state): State<DashboardHandlerState>,
) -> Result<Json<ApiResponse<Vec<MonthlySummaryDto>>>, ApiError<Vec<MonthlySummaryDto>>> {
    let summary = state
        .dashboard
        .monthly_summary()
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        summary.into_iter().map(MonthlySummaryDto::from).collect(),
    )))
}

/// Orders between two venue-local days with revenue totals
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/orders",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    params(RangeQuery),
    responses(
        (status = 200, description = "Orders and totals", body = ApiResponse<RangeReportDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn orders_in_range(
    State(state): State<DashboardHandlerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<RangeReportDto>>, ApiError<RangeReportDto>> {
    let report = state
        .dashboard
        .orders_in_range(query.from.as_deref(), query.to.as_deref(), Utc::now())
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(report.into())))
}
