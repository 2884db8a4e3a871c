//! Inventory movement records.

pub mod wastage;

pub use wastage::WastageRecord;
