//! Report aggregation pipeline.
//!
//! Turns fetched record collections into report-ready tables and summaries.
//! Everything here is deterministic: no IO, no clocks, no shared state. The
//! caller supplies the data snapshot, the report date and the settings.

pub mod aggregators;
pub mod data;
pub mod filter;
pub mod format;
pub mod kind;
pub mod result;
pub mod settings;

pub use data::{Collection, ReportData};
pub use filter::{ShopFilter, ShopOption, shop_options};
pub use kind::{ReportKind, ReportRequest, ReportSelection};
pub use result::{DaySummary, ReportContent, ReportResult, SummaryMetric};
pub use settings::ReportSettings;
