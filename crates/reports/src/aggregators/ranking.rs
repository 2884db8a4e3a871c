//! Product rankings: top/bottom sellers, most profitable, profit margin.
//!
//! Every ranking accumulates over forward sales only (quantity > 0); returns
//! never move a product up or down. Ties are broken by ascending product id.
//! Rows without a product id have nothing to rank under and are skipped here,
//! though they still count in the day and period totals.

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;

use posreports_core::{ProductId, format_amount, format_decimal, format_quantity};
use posreports_products::ProductCatalog;
use posreports_sales::Sale;

use super::{NO_PRODUCTS, NO_SALES};
use crate::result::ReportResult;
use crate::settings::ReportSettings;

pub const TOP_SELLERS_TITLE: &str = "Top Sellers (by Revenue)";
pub const BOTTOM_SELLERS_TITLE: &str = "Least Sold Products";
pub const TOP_PROFIT_TITLE: &str = "Most Profitable Products";
pub const PROFIT_MARGIN_TITLE: &str = "Profit Margin by Product";

/// A product and the metric it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedProduct {
    pub product_id: ProductId,
    pub value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Descending,
    Ascending,
}

fn accumulate<F>(sales: &[Sale], totals: &mut HashMap<ProductId, Decimal>, metric: F)
where
    F: Fn(&Sale) -> Decimal,
{
    for sale in sales.iter().filter(|s| s.is_forward()) {
        let Some(product_id) = sale.product_id else { continue };
        let total = totals.entry(product_id).or_default();
        *total = total.saturating_add(metric(sale));
    }
}

fn rank(totals: HashMap<ProductId, Decimal>, direction: Direction, limit: usize) -> Vec<RankedProduct> {
    let mut ranked: Vec<RankedProduct> = totals
        .into_iter()
        .map(|(product_id, value)| RankedProduct { product_id, value })
        .collect();

    ranked.sort_by(|a, b| {
        let by_value = match direction {
            Direction::Descending => b.value.cmp(&a.value),
            Direction::Ascending => a.value.cmp(&b.value),
        };
        by_value.then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}

/// Products by summed revenue, highest first.
pub fn top_by_revenue(sales: &[Sale], limit: usize) -> Vec<RankedProduct> {
    let mut totals = HashMap::new();
    accumulate(sales, &mut totals, Sale::revenue);
    rank(totals, Direction::Descending, limit)
}

/// Products by summed quantity, lowest first.
///
/// Every catalog product starts at zero, so products that never sold rank
/// first. Products that only appear in sales are ranked too.
pub fn bottom_by_quantity(sales: &[Sale], catalog: &ProductCatalog, limit: usize) -> Vec<RankedProduct> {
    let mut totals: HashMap<ProductId, Decimal> =
        catalog.iter().map(|p| (p.id, Decimal::ZERO)).collect();
    accumulate(sales, &mut totals, Sale::quantity);
    rank(totals, Direction::Ascending, limit)
}

/// Products by summed profit (revenue − purchase price × quantity), highest first.
pub fn top_by_profit(sales: &[Sale], limit: usize) -> Vec<RankedProduct> {
    let mut totals = HashMap::new();
    accumulate(sales, &mut totals, Sale::profit);
    rank(totals, Direction::Descending, limit)
}

/// Revenue, profit and margin of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductMargin {
    pub product_id: ProductId,
    pub revenue: Decimal,
    pub profit: Decimal,
    /// profit / revenue × 100.
    pub margin: Decimal,
}

/// Products by margin, highest first. Products without positive revenue
/// have no meaningful margin and are left out.
pub fn margins(sales: &[Sale], limit: usize) -> Vec<ProductMargin> {
    let mut sums: HashMap<ProductId, (Decimal, Decimal)> = HashMap::new();
    for sale in sales.iter().filter(|s| s.is_forward()) {
        let Some(product_id) = sale.product_id else { continue };
        let entry = sums.entry(product_id).or_default();
        entry.0 = entry.0.saturating_add(sale.revenue());
        entry.1 = entry.1.saturating_add(sale.profit());
    }

    let mut out: Vec<ProductMargin> = sums
        .into_iter()
        .filter(|(_, (revenue, _))| *revenue > Decimal::ZERO)
        .filter_map(|(product_id, (revenue, profit))| {
            let margin = profit.checked_div(revenue)?.checked_mul(Decimal::ONE_HUNDRED)?;
            Some(ProductMargin {
                product_id,
                revenue,
                profit,
                margin,
            })
        })
        .collect();

    out.sort_by(|a, b| match b.margin.cmp(&a.margin) {
        Ordering::Equal => a.product_id.cmp(&b.product_id),
        other => other,
    });
    out.truncate(limit);
    out
}

pub fn top_sellers_report(sales: &[Sale], catalog: &ProductCatalog, settings: &ReportSettings) -> ReportResult {
    if sales.is_empty() {
        return ReportResult::message(TOP_SELLERS_TITLE, NO_SALES);
    }

    let rows = top_by_revenue(sales, settings.ranking_limit)
        .into_iter()
        .enumerate()
        .map(|(idx, ranked)| {
            vec![
                (idx + 1).to_string(),
                catalog.display_name(ranked.product_id),
                format_amount(ranked.value, &settings.currency),
            ]
        })
        .collect();

    ReportResult::table(TOP_SELLERS_TITLE, &["#", "Product", "Total revenue"], rows)
}

pub fn bottom_sellers_report(sales: &[Sale], catalog: &ProductCatalog, settings: &ReportSettings) -> ReportResult {
    if catalog.is_empty() {
        return ReportResult::message(BOTTOM_SELLERS_TITLE, NO_PRODUCTS);
    }

    let rows = bottom_by_quantity(sales, catalog, settings.ranking_limit)
        .into_iter()
        .enumerate()
        .map(|(idx, ranked)| {
            let (name, quantity) = match catalog.get(ranked.product_id) {
                Some(product) => (
                    product.name.clone(),
                    format_quantity(ranked.value, product.is_weighable),
                ),
                // Unknown product: raw accumulated quantity, unformatted.
                None => (
                    catalog.display_name(ranked.product_id),
                    ranked.value.normalize().to_string(),
                ),
            };
            vec![(idx + 1).to_string(), name, quantity]
        })
        .collect();

    ReportResult::table(BOTTOM_SELLERS_TITLE, &["#", "Product", "Quantity sold"], rows)
}

pub fn top_profit_report(sales: &[Sale], catalog: &ProductCatalog, settings: &ReportSettings) -> ReportResult {
    if sales.is_empty() {
        return ReportResult::message(TOP_PROFIT_TITLE, NO_SALES);
    }

    let rows = top_by_profit(sales, settings.ranking_limit)
        .into_iter()
        .enumerate()
        .map(|(idx, ranked)| {
            vec![
                (idx + 1).to_string(),
                catalog.display_name(ranked.product_id),
                format_amount(ranked.value, &settings.currency),
            ]
        })
        .collect();

    ReportResult::table(TOP_PROFIT_TITLE, &["#", "Product", "Total profit"], rows)
}

pub fn profit_margin_report(sales: &[Sale], catalog: &ProductCatalog, settings: &ReportSettings) -> ReportResult {
    if sales.is_empty() {
        return ReportResult::message(PROFIT_MARGIN_TITLE, NO_SALES);
    }

    let currency = settings.currency.as_str();
    let rows = margins(sales, settings.ranking_limit)
        .into_iter()
        .enumerate()
        .map(|(idx, m)| {
            vec![
                (idx + 1).to_string(),
                catalog.display_name(m.product_id),
                format_amount(m.revenue, currency),
                format_amount(m.profit, currency),
                format!("%{}", format_decimal(m.margin, 2)),
            ]
        })
        .collect();

    ReportResult::table(
        PROFIT_MARGIN_TITLE,
        &["#", "Product", "Revenue", "Profit", "Margin"],
        rows,
    )
}
