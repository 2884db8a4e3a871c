//! Report aggregators: pure functions from record sets to report views.
//!
//! Each aggregator owns its title and empty-state message and never fails:
//! missing numeric fields count as zero and empty input yields a message
//! result instead of an empty table.

pub mod day_summary;
pub mod hourly;
pub mod period;
pub mod ranking;
pub mod wastage;

/// Empty state for reports driven by the sales collection.
pub const NO_SALES: &str = "No sales records found for the selected filter.";

/// Empty state for reports driven by the product collection.
pub const NO_PRODUCTS: &str = "No products found for the selected filter.";
