//! Shared building blocks for the report pipeline.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the error
//! model, row timestamps and the money/quantity arithmetic used by every
//! report.

pub mod de;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod timestamp;

pub use entity::{Entity, dedup_first};
pub use error::DomainError;
pub use id::{ProductId, SaleId, ShopId};
pub use money::{format_amount, format_decimal, format_quantity, to_decimal};
pub use timestamp::Timestamp;
