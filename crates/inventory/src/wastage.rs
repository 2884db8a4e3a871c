use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posreports_core::{ShopId, Timestamp, to_decimal};

/// Row of the backend `wastage_history` table: stock written off as waste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WastageRecord {
    #[serde(default)]
    pub shop_id: Option<ShopId>,
    #[serde(default, deserialize_with = "posreports_core::de::lenient_timestamp")]
    pub created_at: Option<Timestamp>,
    /// Name captured at write-off time; survives product deletion.
    #[serde(default, deserialize_with = "posreports_core::de::null_as_default")]
    pub product_name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "posreports_core::de::null_as_default")]
    pub reason: String,
    #[serde(default)]
    pub cost: Option<f64>,
}

impl WastageRecord {
    pub fn new(product_name: impl Into<String>, quantity: f64, reason: impl Into<String>) -> Self {
        Self {
            shop_id: None,
            created_at: None,
            product_name: product_name.into(),
            quantity: Some(quantity),
            reason: reason.into(),
            cost: None,
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// When the stock was written off, reading an offset-less timestamp in
    /// `offset`.
    pub fn occurred_at(&self, offset: FixedOffset) -> Option<DateTime<Utc>> {
        self.created_at.map(|at| at.resolve(offset))
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity.map(to_decimal).unwrap_or_default()
    }

    pub fn cost(&self) -> Decimal {
        self.cost.map(to_decimal).unwrap_or_default()
    }
}
