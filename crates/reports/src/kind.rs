//! Report registry: one variant per report, each owning its generator.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use posreports_core::DomainError;

use crate::aggregators::{day_summary, hourly, period, ranking, wastage};
use crate::data::ReportData;
use crate::result::{COMING_SOON, NOT_CONFIGURED, ReportResult};
use crate::settings::ReportSettings;

/// Every report offered on the hub.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    EndOfDay,
    Wastage,
    TopSellers,
    BottomSellers,
    TopProfit,
    ProfitMargin,
    RevenueProfit,
    HourlySales,
    /// No channel data is recorded yet; always renders a placeholder.
    ChannelSales,
}

/// Per-invocation inputs besides the fetched data.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    /// Report day for date-driven reports (end-of-day, revenue by day).
    pub date: NaiveDate,
}

impl ReportKind {
    /// Hub order.
    pub const ALL: [ReportKind; 9] = [
        ReportKind::RevenueProfit,
        ReportKind::ChannelSales,
        ReportKind::HourlySales,
        ReportKind::EndOfDay,
        ReportKind::Wastage,
        ReportKind::TopSellers,
        ReportKind::TopProfit,
        ReportKind::BottomSellers,
        ReportKind::ProfitMargin,
    ];

    /// Stable identifier used by hub cards and the CLI.
    pub fn id(&self) -> &'static str {
        match self {
            ReportKind::EndOfDay => "end-of-day",
            ReportKind::Wastage => "wastage",
            ReportKind::TopSellers => "top-sellers",
            ReportKind::BottomSellers => "bottom-sellers",
            ReportKind::TopProfit => "top-profit",
            ReportKind::ProfitMargin => "profit-margin",
            ReportKind::RevenueProfit => "revenue-profit",
            ReportKind::HourlySales => "hourly-sales",
            ReportKind::ChannelSales => "channel-sales",
        }
    }

    /// Card key of the first-generation web hub, still sent by older clients.
    pub fn legacy_id(&self) -> &'static str {
        match self {
            ReportKind::EndOfDay => "gunSonu",
            ReportKind::Wastage => "fireZayiat",
            ReportKind::TopSellers => "enCokSatan",
            ReportKind::BottomSellers => "enAzSatan",
            ReportKind::TopProfit => "enCokKar",
            ReportKind::ProfitMargin => "karMarji",
            ReportKind::RevenueProfit => "ciroKar",
            ReportKind::HourlySales => "saatlikSatis",
            ReportKind::ChannelSales => "kanalSatis",
        }
    }

    /// Look up a report by id or legacy card key.
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id || kind.legacy_id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::EndOfDay => day_summary::TITLE,
            ReportKind::Wastage => wastage::TITLE,
            ReportKind::TopSellers => ranking::TOP_SELLERS_TITLE,
            ReportKind::BottomSellers => ranking::BOTTOM_SELLERS_TITLE,
            ReportKind::TopProfit => ranking::TOP_PROFIT_TITLE,
            ReportKind::ProfitMargin => ranking::PROFIT_MARGIN_TITLE,
            ReportKind::RevenueProfit => period::TITLE,
            ReportKind::HourlySales => hourly::TITLE,
            ReportKind::ChannelSales => "Sales Channel Performance",
        }
    }

    /// Whether generating this report reads backend data at all.
    pub fn needs_data(&self) -> bool {
        !matches!(self, ReportKind::ChannelSales)
    }

    /// Whether the report date changes this report's output.
    pub fn uses_date(&self) -> bool {
        matches!(self, ReportKind::EndOfDay | ReportKind::RevenueProfit)
    }

    pub fn generate(&self, data: &ReportData, request: &ReportRequest, settings: &ReportSettings) -> ReportResult {
        match self {
            ReportKind::EndOfDay => day_summary::end_of_day_report(&data.sales(), request.date, settings),
            ReportKind::Wastage => wastage::wastage_report(&data.wastage(), settings),
            ReportKind::TopSellers => ranking::top_sellers_report(&data.sales(), &data.products(), settings),
            ReportKind::BottomSellers => {
                ranking::bottom_sellers_report(&data.sales(), &data.products(), settings)
            }
            ReportKind::TopProfit => ranking::top_profit_report(&data.sales(), &data.products(), settings),
            ReportKind::ProfitMargin => {
                ranking::profit_margin_report(&data.sales(), &data.products(), settings)
            }
            ReportKind::RevenueProfit => period::revenue_profit_report(&data.sales(), request.date, settings),
            ReportKind::HourlySales => hourly::hourly_sales_report(&data.sales(), settings),
            ReportKind::ChannelSales => ReportResult::message(self.title(), COMING_SOON),
        }
    }
}

impl core::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ReportKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::validation(format!("unknown report '{s}'")))
    }
}

/// What a hub selection resolved to. Unknown ids stay selectable and render
/// a placeholder rather than failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSelection {
    Report(ReportKind),
    Unknown(String),
}

impl ReportSelection {
    pub fn resolve(id: &str) -> Self {
        match ReportKind::parse(id) {
            Some(kind) => ReportSelection::Report(kind),
            None => ReportSelection::Unknown(id.trim().to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ReportSelection::Report(kind) => kind.id(),
            ReportSelection::Unknown(id) => id,
        }
    }

    pub fn kind(&self) -> Option<ReportKind> {
        match self {
            ReportSelection::Report(kind) => Some(*kind),
            ReportSelection::Unknown(_) => None,
        }
    }

    pub fn needs_data(&self) -> bool {
        self.kind().is_some_and(|kind| kind.needs_data())
    }

    pub fn generate(&self, data: &ReportData, request: &ReportRequest, settings: &ReportSettings) -> ReportResult {
        match self {
            ReportSelection::Report(kind) => kind.generate(data, request, settings),
            ReportSelection::Unknown(id) => ReportResult::message(format!("Report: {id}"), NOT_CONFIGURED),
        }
    }
}
