//! Revenue summaries for the admin dashboard

pub mod model;

pub use model::{month_label, summarize_by_month, MonthlySummary, RangeTotals};
