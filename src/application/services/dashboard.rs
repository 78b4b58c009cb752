//! Admin revenue reports

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::dashboard::summarize_by_month;
use crate::domain::{DomainError, DomainResult, MonthlySummary, OrderDetails, RangeTotals, RepositoryProvider};
use crate::support::time::VenueClock;

/// Orders in an inclusive range of venue-local days
#[derive(Debug, Clone)]
pub struct RangeReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub orders: Vec<OrderDetails>,
    pub totals: RangeTotals,
}

pub struct DashboardService {
    repos: Arc<dyn RepositoryProvider>,
    clock: VenueClock,
}

impl DashboardService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: VenueClock) -> Self {
        Self { repos, clock }
    }

    pub async fn monthly_summary(&self) -> DomainResult<Vec<MonthlySummary>> {
        let orders = self.repos.orders().find_all_details().await?;
        Ok(summarize_by_month(&orders, &self.clock))
    }

    /// Missing or unreadable bounds fall back to the current venue month
    pub async fn orders_in_range(
        &self,
        from: Option<&str>,
        to: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<RangeReport> {
        let (month_start, month_end) = self.clock.month_days(now);
        let from = self.clock.parse_date(from).unwrap_or(month_start);
        let to = self.clock.parse_date(to).unwrap_or(month_end);

        let out_of_range = || DomainError::Validation("Date is out of range".into());
        let (start, _) = self.clock.day_bounds(from).ok_or_else(out_of_range)?;
        let (_, until) = self.clock.day_bounds(to).ok_or_else(out_of_range)?;
        let orders = self.repos.orders().find_details_between(start, until).await?;
        let totals = RangeTotals::from_orders(&orders);

        Ok(RangeReport {
            from,
            to,
            orders,
            totals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{repositories, seed_item, seed_table};
    use crate::domain::{Order, OrderLine};

    #[tokio::test]
    async fn range_defaults_to_current_month_and_totals_split_by_paid() {
        let repos = repositories().await;
        let one = seed_table(&repos, "Meja 1", "1").await;
        let two = seed_table(&repos, "Meja 2", "2").await;
        let teh = seed_item(&repos, "Teh", 5_000, 10).await;

        let mut paid = Order::new(&one.id, "Andi", 2, None);
        paid.paid = true;
        repos
            .orders()
            .place(&paid, &[OrderLine::new(&teh.id, 2)])
            .await
            .unwrap();
        let unpaid = Order::new(&two.id, "Budi", 1, None);
        repos.orders().place(&unpaid, &[]).await.unwrap();

        let svc = DashboardService::new(repos, VenueClock::default());
        let report = svc
            .orders_in_range(None, Some("not-a-date"), unpaid.created_at)
            .await
            .unwrap();
        assert_eq!(report.orders.len(), 2);
        assert_eq!(report.totals.paid_orders, 1);
        assert_eq!(report.totals.paid_table_revenue, 50_000);
        assert_eq!(report.totals.paid_fnb_revenue, 10_000);
        assert_eq!(report.totals.unpaid_orders, 1);
        assert_eq!(report.totals.unpaid_table_revenue, 25_000);

        let empty = svc
            .orders_in_range(Some("2001-01-01"), Some("2001-01-31"), unpaid.created_at)
            .await
            .unwrap();
        assert!(empty.orders.is_empty());
        assert_eq!(empty.totals, RangeTotals::default());

        let months = svc.monthly_summary().await.unwrap();
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].total_paid_order, 50_000);
        assert_eq!(months[0].total_unpaid_order, 25_000);
        assert_eq!(months[0].total_paid_fnb, 10_000);

        let edge = svc
            .orders_in_range(Some("-262143-01-01"), None, unpaid.created_at)
            .await
            .unwrap();
        assert_eq!(edge.orders.len(), 2);
    }
}
