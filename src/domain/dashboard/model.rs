//! Pure aggregation over order details

use crate::domain::order::OrderDetails;
use crate::support::time::VenueClock;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Indonesian short month name, 1-based month
pub fn month_label(month: u32) -> &'static str {
    MONTH_LABELS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

/// Revenue of one venue-local calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySummary {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub total_paid_order: i64,
    pub total_unpaid_order: i64,
    pub total_paid_fnb: i64,
    pub total_unpaid_fnb: i64,
}

impl MonthlySummary {
    fn empty(year: i32, month: u32) -> Self {
        Self {
            name: month_label(month).to_string(),
            year,
            month,
            total_paid_order: 0,
            total_unpaid_order: 0,
            total_paid_fnb: 0,
            total_unpaid_fnb: 0,
        }
    }

    fn add(&mut self, details: &OrderDetails) {
        if details.order.paid {
            self.total_paid_order = self.total_paid_order.saturating_add(details.table_cost());
            self.total_paid_fnb = self.total_paid_fnb.saturating_add(details.fnb_cost());
        } else {
            self.total_unpaid_order = self.total_unpaid_order.saturating_add(details.table_cost());
            self.total_unpaid_fnb = self.total_unpaid_fnb.saturating_add(details.fnb_cost());
        }
    }
}

/// Bucket orders by local (year, month). Buckets come out in the order
/// their first order appears, so pass orders oldest first for a timeline.
pub fn summarize_by_month(orders: &[OrderDetails], clock: &VenueClock) -> Vec<MonthlySummary> {
    let mut summary: Vec<MonthlySummary> = Vec::new();
    for details in orders {
        let (year, month) = clock.year_month(details.order.created_at);
        let index = match summary
            .iter()
            .position(|bucket| bucket.year == year && bucket.month == month)
        {
            Some(index) => index,
            None => {
                summary.push(MonthlySummary::empty(year, month));
                summary.len() - 1
            }
        };
        summary[index].add(details);
    }
    summary
}

/// Headline numbers for a date range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTotals {
    pub paid_orders: u64,
    pub unpaid_orders: u64,
    pub paid_table_revenue: i64,
    pub unpaid_table_revenue: i64,
    pub paid_fnb_revenue: i64,
    pub unpaid_fnb_revenue: i64,
}

impl RangeTotals {
    pub fn from_orders(orders: &[OrderDetails]) -> Self {
        orders.iter().fold(Self::default(), |mut totals, details| {
            if details.order.paid {
                totals.paid_orders += 1;
                totals.paid_table_revenue =
                    totals.paid_table_revenue.saturating_add(details.table_cost());
                totals.paid_fnb_revenue = totals.paid_fnb_revenue.saturating_add(details.fnb_cost());
            } else {
                totals.unpaid_orders += 1;
                totals.unpaid_table_revenue =
                    totals.unpaid_table_revenue.saturating_add(details.table_cost());
                totals.unpaid_fnb_revenue =
                    totals.unpaid_fnb_revenue.saturating_add(details.fnb_cost());
            }
            totals
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Order, OrderLineDetails};
    use chrono::{TimeZone, Utc};

    fn details(y: i32, m: u32, paid: bool, hours: i32, fnb_qty: i32) -> OrderDetails {
        let mut order = Order::new("t", "c", hours, None);
        order.created_at = Utc.with_ymd_and_hms(y, m, 10, 12, 0, 0).unwrap();
        order.paid = paid;
        OrderDetails {
            order,
            table_name: "Meja".into(),
            table_price: 20_000,
            device_id: "1".into(),
            lines: vec![OrderLineDetails {
                item_id: "i".into(),
                name: "Teh".into(),
                price: 5_000,
                quantity: fnb_qty,
            }],
            creator_name: None,
            creator_email: None,
        }
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(5), "Mei");
        assert_eq!(month_label(12), "Des");
        assert_eq!(month_label(0), "?");
    }

    #[test]
    fn summary_splits_paid_and_unpaid() {
        let orders = vec![
            details(2024, 1, true, 2, 1),
            details(2024, 1, false, 1, 2),
            details(2024, 2, true, 1, 0),
        ];
        let summary = summarize_by_month(&orders, &VenueClock::utc());
        assert_eq!(summary.len(), 2);

        let jan = &summary[0];
        assert_eq!(jan.name, "Jan");
        assert_eq!(jan.total_paid_order, 40_000);
        assert_eq!(jan.total_paid_fnb, 5_000);
        assert_eq!(jan.total_unpaid_order, 20_000);
        assert_eq!(jan.total_unpaid_fnb, 10_000);

        assert_eq!(summary[1].name, "Feb");
        assert_eq!(summary[1].total_paid_order, 20_000);
    }

    #[test]
    fn same_month_in_different_years_is_separate() {
        let orders = vec![details(2023, 3, true, 1, 0), details(2024, 3, true, 1, 0)];
        let summary = summarize_by_month(&orders, &VenueClock::utc());
        assert_eq!(summary.len(), 2);
        assert_eq!((summary[0].year, summary[1].year), (2023, 2024));
    }

    #[test]
    fn range_totals_count_orders() {
        let orders = vec![
            details(2024, 1, true, 1, 1),
            details(2024, 1, false, 2, 0),
            details(2024, 1, false, 1, 3),
        ];
        let totals = RangeTotals::from_orders(&orders);
        assert_eq!(totals.paid_orders, 1);
        assert_eq!(totals.unpaid_orders, 2);
        assert_eq!(totals.paid_table_revenue, 20_000);
        assert_eq!(totals.unpaid_table_revenue, 60_000);
        assert_eq!(totals.paid_fnb_revenue, 5_000);
        assert_eq!(totals.unpaid_fnb_revenue, 15_000);
    }

    #[test]
    fn totals_saturate_on_extreme_prices() {
        let mut pricey = details(2024, 1, true, 2, 1);
        pricey.table_price = i64::MAX / 2 + 1;
        let orders = vec![pricey.clone(), pricey];

        let summary = summarize_by_month(&orders, &VenueClock::utc());
        assert_eq!(summary[0].total_paid_order, i64::MAX);
        let totals = RangeTotals::from_orders(&orders);
        assert_eq!(totals.paid_table_revenue, i64::MAX);
    }
}
