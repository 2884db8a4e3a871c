//! Product and shop records.
//!
//! Read-only snapshots of the backend `products` and `shops` tables, plus the
//! lookup structure reports use to resolve product names.

pub mod catalog;
pub mod product;
pub mod shop;

pub use catalog::ProductCatalog;
pub use product::Product;
pub use shop::Shop;
