use serde::{Deserialize, Serialize};

use posreports_core::{Entity, ProductId, ShopId};

/// Product row as returned by the backend `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "posreports_core::de::null_as_default")]
    pub name: String,
    #[serde(default)]
    pub shop_id: Option<ShopId>,
    /// Sold by weight; quantities display with fractional precision.
    #[serde(default, deserialize_with = "posreports_core::de::null_as_default")]
    pub is_weighable: bool,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            shop_id: None,
            is_weighable: false,
        }
    }

    pub fn weighable(mut self) -> Self {
        self.is_weighable = true;
        self
    }

    pub fn in_shop(mut self, shop_id: ShopId) -> Self {
        self.shop_id = Some(shop_id);
        self
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}
