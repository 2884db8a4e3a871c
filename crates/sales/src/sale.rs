use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posreports_core::{ProductId, SaleId, ShopId, Timestamp, to_decimal};

/// Which side of the ledger a sale row falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleDirection {
    /// Positive quantity: counts toward revenue and profit.
    Forward,
    /// Negative quantity: counts toward returns (absolute revenue).
    Return,
    /// Zero quantity: counts toward nothing.
    Neutral,
}

/// Sale row as returned by the backend `sales` table.
///
/// Amount columns are nullable; unset values read as zero. A row whose
/// product was deleted keeps `product_id: None` and still counts toward
/// totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    #[serde(default)]
    pub shop_id: Option<ShopId>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Signed quantity; negative means a return.
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    /// Unit purchase (cost) price.
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "posreports_core::de::lenient_timestamp")]
    pub created_at: Option<Timestamp>,
}

impl Sale {
    pub fn new(id: SaleId, product_id: ProductId, quantity: f64, total_revenue: f64) -> Self {
        Self {
            id,
            shop_id: None,
            product_id: Some(product_id),
            quantity: Some(quantity),
            total_revenue: Some(total_revenue),
            purchase_price: None,
            created_at: None,
        }
    }

    pub fn with_purchase_price(mut self, purchase_price: f64) -> Self {
        self.purchase_price = Some(purchase_price);
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn in_shop(mut self, shop_id: ShopId) -> Self {
        self.shop_id = Some(shop_id);
        self
    }

    /// When the sale happened, reading an offset-less timestamp in `offset`.
    pub fn occurred_at(&self, offset: FixedOffset) -> Option<DateTime<Utc>> {
        self.created_at.map(|at| at.resolve(offset))
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity.map(to_decimal).unwrap_or_default()
    }

    pub fn revenue(&self) -> Decimal {
        self.total_revenue.map(to_decimal).unwrap_or_default()
    }

    pub fn purchase_price(&self) -> Decimal {
        self.purchase_price.map(to_decimal).unwrap_or_default()
    }

    pub fn direction(&self) -> SaleDirection {
        let quantity = self.quantity();
        if quantity > Decimal::ZERO {
            SaleDirection::Forward
        } else if quantity < Decimal::ZERO {
            SaleDirection::Return
        } else {
            SaleDirection::Neutral
        }
    }

    pub fn is_forward(&self) -> bool {
        self.direction() == SaleDirection::Forward
    }

    pub fn is_return(&self) -> bool {
        self.direction() == SaleDirection::Return
    }

    /// Cost of goods for this row: purchase price × quantity, clamped to the
    /// `Decimal` range.
    pub fn cost(&self) -> Decimal {
        self.purchase_price().saturating_mul(self.quantity())
    }

    /// Revenue minus cost of goods.
    pub fn profit(&self) -> Decimal {
        self.revenue().saturating_sub(self.cost())
    }

    /// Amount refunded by a return row. Always non-negative.
    pub fn return_amount(&self) -> Decimal {
        self.revenue().abs()
    }
}
