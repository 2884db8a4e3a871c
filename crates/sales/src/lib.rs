//! Sale records and sale arithmetic.
//!
//! A sale row with negative quantity is a return. This crate owns that rule so
//! every report partitions sales the same way.

pub mod sale;
pub mod totals;

pub use sale::{Sale, SaleDirection};
pub use totals::SaleTotals;
