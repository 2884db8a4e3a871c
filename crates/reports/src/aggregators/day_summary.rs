//! End-of-day summary: revenue, profit and returns for one calendar day.

use chrono::NaiveDate;

use posreports_core::format_amount;
use posreports_sales::{Sale, SaleTotals};

use crate::result::{DaySummary, ReportResult, SummaryMetric};
use crate::settings::ReportSettings;

pub const TITLE: &str = "End-of-Day Summary";

/// Shown when no sales were fetched at all.
pub const NO_SALES_DATA: &str = "No sales data found.";

/// Sales whose timestamp falls inside `date` (inclusive both ends) in the
/// reporting offset. Rows without a timestamp never match.
pub fn sales_on_day<'a>(
    sales: &'a [Sale],
    date: NaiveDate,
    settings: &ReportSettings,
) -> impl Iterator<Item = &'a Sale> {
    let (start, end) = settings.day_window(date);
    let offset = settings.utc_offset;
    sales
        .iter()
        .filter(move |s| matches!(s.occurred_at(offset), Some(at) if at >= start && at <= end))
}

/// Totals for `date`. A pure function of (sales, date).
pub fn summarize_day(sales: &[Sale], date: NaiveDate, settings: &ReportSettings) -> SaleTotals {
    sales_on_day(sales, date, settings).collect()
}

pub fn end_of_day_report(sales: &[Sale], date: NaiveDate, settings: &ReportSettings) -> ReportResult {
    if sales.is_empty() {
        return ReportResult::message(TITLE, NO_SALES_DATA);
    }

    let totals = summarize_day(sales, date, settings);
    tracing::debug!(
        %date,
        forward = totals.forward_count,
        returns = totals.return_count,
        "end-of-day totals computed"
    );

    let currency = settings.currency.as_str();
    ReportResult::day_summary(
        TITLE,
        DaySummary {
            date,
            metrics: vec![
                SummaryMetric::new("Total revenue", format_amount(totals.revenue, currency)),
                SummaryMetric::new("Total profit", format_amount(totals.profit, currency)),
                SummaryMetric::new("Total returns", format_amount(totals.returns, currency)),
            ],
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use posreports_core::{ProductId, SaleId};
    use rust_decimal::Decimal;

    use crate::result::ReportContent;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn noon() -> DateTime<Utc> {
        // 12:00 local (UTC+3)
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    fn sale(quantity: f64, revenue: f64, purchase_price: f64, at: DateTime<Utc>) -> Sale {
        Sale::new(SaleId::new(1), ProductId::new(1), quantity, revenue)
            .with_purchase_price(purchase_price)
            .at(at)
    }

    fn metric_values(result: &ReportResult) -> Vec<String> {
        match &result.content {
            Some(ReportContent::DaySummary(summary)) => {
                summary.metrics.iter().map(|m| m.value.clone()).collect()
            }
            other => panic!("Expected day summary, got {:?}", other),
        }
    }

    #[test]
    fn sale_and_return_on_the_same_day() {
        let settings = ReportSettings::default();
        let sales = vec![
            sale(2.0, 100.0, 20.0, noon()),
            Sale::new(SaleId::new(2), ProductId::new(1), -1.0, -40.0).at(noon()),
        ];

        let totals = summarize_day(&sales, day(), &settings);
        assert_eq!(totals.revenue, Decimal::new(100, 0));
        assert_eq!(totals.profit, Decimal::new(60, 0));
        assert_eq!(totals.returns, Decimal::new(40, 0));

        let result = end_of_day_report(&sales, day(), &settings);
        assert_eq!(result.title, TITLE);
        assert_eq!(metric_values(&result), vec!["100.00 TL", "60.00 TL", "40.00 TL"]);
    }

    #[test]
    fn window_is_inclusive_at_both_ends() {
        let settings = ReportSettings::default();
        let (start, end) = settings.day_window(day());
        let sales = vec![
            sale(1.0, 1.0, 0.0, start),
            sale(1.0, 2.0, 0.0, end),
            sale(1.0, 4.0, 0.0, start - Duration::milliseconds(1)),
            sale(1.0, 8.0, 0.0, end + Duration::milliseconds(1)),
        ];

        let totals = summarize_day(&sales, day(), &settings);
        assert_eq!(totals.revenue, Decimal::new(3, 0));
        assert_eq!(totals.forward_count, 2);
    }

    #[test]
    fn sales_without_timestamp_are_excluded() {
        let settings = ReportSettings::default();
        let sales = vec![Sale::new(SaleId::new(1), ProductId::new(1), 1.0, 50.0)];
        let totals = summarize_day(&sales, day(), &settings);
        assert!(totals.is_empty());
        assert_eq!(
            metric_values(&end_of_day_report(&sales, day(), &settings)),
            vec!["0.00 TL", "0.00 TL", "0.00 TL"]
        );
    }

    #[test]
    fn empty_sales_yield_empty_state_message() {
        let result = end_of_day_report(&[], day(), &ReportSettings::default());
        assert_eq!(result.message_text(), Some(NO_SALES_DATA));
    }

    #[test]
    fn changing_the_date_recomputes_from_the_same_sales() {
        let settings = ReportSettings::default();
        let sales = vec![sale(1.0, 10.0, 0.0, noon())];
        let next_day = day().succ_opt().unwrap();

        assert_eq!(summarize_day(&sales, day(), &settings).revenue, Decimal::new(10, 0));
        assert_eq!(summarize_day(&sales, next_day, &settings).revenue, Decimal::ZERO);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_sale() -> impl Strategy<Value = Sale> {
            // quantity, revenue, purchase price in exact quarter steps; offset
            // in minutes around the report day so some rows fall outside it.
            (-20i64..20, -8_000i64..8_000, 0i64..800, -2_000i64..3_000).prop_map(
                |(q, r, p, minutes)| {
                    sale(
                        q as f64 / 4.0,
                        r as f64 / 4.0,
                        p as f64 / 4.0,
                        noon() + Duration::minutes(minutes),
                    )
                },
            )
        }

        proptest! {
            /// Property: revenue − profit = Σ purchase_price × quantity over the
            /// day's forward sales.
            #[test]
            fn revenue_minus_profit_is_daily_cost(sales in proptest::collection::vec(arb_sale(), 0..50)) {
                let settings = ReportSettings::default();
                let totals = summarize_day(&sales, day(), &settings);
                let cost: Decimal = sales_on_day(&sales, day(), &settings)
                    .filter(|s| s.is_forward())
                    .map(|s| s.purchase_price() * s.quantity())
                    .sum();
                prop_assert_eq!(totals.revenue - totals.profit, cost);
            }

            /// Property: the daily totals never include returns in revenue.
            #[test]
            fn returns_never_count_as_revenue(sales in proptest::collection::vec(arb_sale(), 0..50)) {
                let settings = ReportSettings::default();
                let only_returns: Vec<Sale> = sales.into_iter().filter(|s| s.is_return()).collect();
                let totals = summarize_day(&only_returns, day(), &settings);
                prop_assert_eq!(totals.revenue, Decimal::ZERO);
                prop_assert_eq!(totals.profit, Decimal::ZERO);
            }
        }
    }
}
