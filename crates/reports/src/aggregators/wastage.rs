//! Wastage listing, newest first.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use posreports_core::format_amount;
use posreports_inventory::WastageRecord;

use crate::format::local_datetime;
use crate::result::ReportResult;
use crate::settings::ReportSettings;

pub const TITLE: &str = "Wastage Report";

pub const NO_WASTAGE: &str = "No wastage records found for the selected filter.";

pub const HEADERS: [&str; 5] = ["Date", "Product", "Quantity", "Reason", "Cost"];

/// Newest first; records without a timestamp sink to the bottom. The sort is
/// stable, so equal timestamps keep fetch order.
fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn wastage_report(records: &[WastageRecord], settings: &ReportSettings) -> ReportResult {
    if records.is_empty() {
        return ReportResult::message(TITLE, NO_WASTAGE);
    }

    let offset = settings.utc_offset;
    let mut sorted: Vec<(Option<DateTime<Utc>>, &WastageRecord)> =
        records.iter().map(|r| (r.occurred_at(offset), r)).collect();
    sorted.sort_by(|(a, _), (b, _)| newest_first(*a, *b));

    let rows = sorted
        .into_iter()
        .map(|(at, record)| {
            vec![
                at.map(|at| local_datetime(at, offset)).unwrap_or_default(),
                record.product_name.clone(),
                record.quantity().normalize().to_string(),
                record.reason.clone(),
                format_amount(record.cost(), &settings.currency),
            ]
        })
        .collect();

    ReportResult::table(TITLE, &HEADERS, rows)
}
