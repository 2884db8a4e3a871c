//! Revenue & profit grouped by calendar day over a trailing period.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use posreports_core::format_amount;
use posreports_sales::{Sale, SaleTotals};

use super::NO_SALES;
use crate::format::local_date;
use crate::result::ReportResult;
use crate::settings::ReportSettings;

pub const TITLE: &str = "Revenue & Profit by Day";

pub const NO_ACTIVITY: &str = "No sales in the selected period.";

pub const HEADERS: [&str; 4] = ["Date", "Revenue", "Profit", "Returns"];

/// First day of the period ending on `end` (inclusive). Periods reaching
/// past the calendar's first day start there.
pub fn period_start(end: NaiveDate, days: u32) -> NaiveDate {
    Duration::try_days(i64::from(days.max(1)) - 1)
        .and_then(|span| end.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN)
}

/// Totals per local calendar day for `[period_start, end]`. Days without any
/// forward sale or return are absent.
pub fn group_by_day(sales: &[Sale], end: NaiveDate, settings: &ReportSettings) -> BTreeMap<NaiveDate, SaleTotals> {
    let start = period_start(end, settings.period_days);
    let mut days: BTreeMap<NaiveDate, SaleTotals> = BTreeMap::new();

    for sale in sales {
        let Some(at) = sale.occurred_at(settings.utc_offset) else { continue };
        let date = settings.local_date(at);
        if date < start || date > end {
            continue;
        }
        days.entry(date).or_default().add(sale);
    }

    days.retain(|_, totals| !totals.is_empty());
    days
}

pub fn revenue_profit_report(sales: &[Sale], end: NaiveDate, settings: &ReportSettings) -> ReportResult {
    if sales.is_empty() {
        return ReportResult::message(TITLE, NO_SALES);
    }

    let days = group_by_day(sales, end, settings);
    if days.is_empty() {
        return ReportResult::message(TITLE, NO_ACTIVITY);
    }

    let currency = settings.currency.as_str();
    let mut overall = SaleTotals::new();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(days.len() + 1);

    for (date, totals) in &days {
        overall.revenue = overall.revenue.saturating_add(totals.revenue);
        overall.profit = overall.profit.saturating_add(totals.profit);
        overall.returns = overall.returns.saturating_add(totals.returns);
        rows.push(vec![
            local_date(*date),
            format_amount(totals.revenue, currency),
            format_amount(totals.profit, currency),
            format_amount(totals.returns, currency),
        ]);
    }

    rows.push(vec![
        "Total".to_string(),
        format_amount(overall.revenue, currency),
        format_amount(overall.profit, currency),
        format_amount(overall.returns, currency),
    ]);

    ReportResult::table(TITLE, &HEADERS, rows)
}
