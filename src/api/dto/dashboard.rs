//! Dashboard DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::order::OrderDto;
use crate::application::RangeReport;
use crate::domain::{MonthlySummary, RangeTotals};

/// Revenue of one month
#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlySummaryDto {
    /// Short month name (`Jan` … `Des`)
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub total_paid_order: i64,
    pub total_unpaid_order: i64,
    pub total_paid_fnb: i64,
    pub total_unpaid_fnb: i64,
}

impl From<MonthlySummary> for MonthlySummaryDto {
    fn from(s: MonthlySummary) -> Self {
        Self {
            name: s.name,
            year: s.year,
            month: s.month,
            total_paid_order: s.total_paid_order,
            total_unpaid_order: s.total_unpaid_order,
            total_paid_fnb: s.total_paid_fnb,
            total_unpaid_fnb: s.total_unpaid_fnb,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RangeQuery {
    /// First day `YYYY-MM-DD`. Defaults to the first of this month
    pub from: Option<String>,
    /// Last day, inclusive. Defaults to the end of this month
    pub to: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RangeTotalsDto {
    pub paid_orders: u64,
    pub unpaid_orders: u64,
    pub paid_table_revenue: i64,
    pub unpaid_table_revenue: i64,
    pub paid_fnb_revenue: i64,
    pub unpaid_fnb_revenue: i64,
}

impl From<RangeTotals> for RangeTotalsDto {
    fn from(t: RangeTotals) -> Self {
        Self {
            paid_orders: t.paid_orders,
            unpaid_orders: t.unpaid_orders,
            paid_table_revenue: t.paid_table_revenue,
            unpaid_table_revenue: t.unpaid_table_revenue,
            paid_fnb_revenue: t.paid_fnb_revenue,
            unpaid_fnb_revenue: t.unpaid_fnb_revenue,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RangeReportDto {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub totals: RangeTotalsDto,
    pub orders: Vec<OrderDto>,
}

impl From<RangeReport> for RangeReportDto {
    fn from(r: RangeReport) -> Self {
        Self {
            from: r.from,
            to: r.to,
            totals: RangeTotalsDto::from(r.totals),
            orders: r.orders.into_iter().map(OrderDto::from).collect(),
        }
    }
}
