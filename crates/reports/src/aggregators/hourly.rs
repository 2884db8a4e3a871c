//! Hourly sales density: forward sales bucketed by local hour of day.

use chrono::Timelike;
use rust_decimal::Decimal;

use posreports_core::format_amount;
use posreports_sales::Sale;

use super::NO_SALES;
use crate::result::ReportResult;
use crate::settings::ReportSettings;

pub const TITLE: &str = "Hourly Sales Density";

pub const HEADERS: [&str; 3] = ["Hour", "Sales", "Revenue"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourBucket {
    pub sales: usize,
    pub revenue: Decimal,
}

/// 24 buckets indexed by local hour. Returns and undated rows are skipped.
pub fn bucket_by_hour(sales: &[Sale], settings: &ReportSettings) -> [HourBucket; 24] {
    let mut buckets = [HourBucket::default(); 24];
    for sale in sales.iter().filter(|s| s.is_forward()) {
        let Some(at) = sale.occurred_at(settings.utc_offset) else { continue };
        let hour = at.with_timezone(&settings.utc_offset).hour() as usize;
        let bucket = &mut buckets[hour];
        bucket.sales += 1;
        bucket.revenue = bucket.revenue.saturating_add(sale.revenue());
    }
    buckets
}

pub fn hourly_sales_report(sales: &[Sale], settings: &ReportSettings) -> ReportResult {
    if sales.is_empty() {
        return ReportResult::message(TITLE, NO_SALES);
    }

    let rows = bucket_by_hour(sales, settings)
        .iter()
        .enumerate()
        .map(|(hour, bucket)| {
            vec![
                format!("{hour:02}:00-{hour:02}:59"),
                bucket.sales.to_string(),
                format_amount(bucket.revenue, &settings.currency),
            ]
        })
        .collect();

    ReportResult::table(TITLE, &HEADERS, rows)
}
