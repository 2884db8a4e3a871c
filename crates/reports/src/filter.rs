//! Shop filter: the single dimension reports are scoped by.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use posreports_core::{DomainError, ShopId};
use posreports_products::Shop;

/// Text form of [`ShopFilter::All`] in the filter control.
pub const ALL_SHOPS: &str = "all";

/// Which shop's records a report reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopFilter {
    /// Every shop (overview).
    All,
    Shop(ShopId),
}

impl ShopFilter {
    /// Shop id to filter on, or `None` for no filter.
    pub fn shop_id(&self) -> Option<ShopId> {
        match self {
            ShopFilter::All => None,
            ShopFilter::Shop(id) => Some(*id),
        }
    }
}

impl core::fmt::Display for ShopFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ShopFilter::All => f.write_str(ALL_SHOPS),
            ShopFilter::Shop(id) => core::fmt::Display::fmt(id, f),
        }
    }
}

impl FromStr for ShopFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_SHOPS) {
            return Ok(ShopFilter::All);
        }
        Ok(ShopFilter::Shop(s.parse()?))
    }
}

/// One entry of the shop filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopOption {
    pub filter: ShopFilter,
    pub label: String,
}

/// Build the filter options offered to a manager.
///
/// Order: the operator's own shop first (when known), then the all-shops
/// overview, then every other shop in backend order.
pub fn shop_options(current: Option<&Shop>, shops: &[Shop]) -> Vec<ShopOption> {
    let mut options = Vec::with_capacity(shops.len() + 2);

    if let Some(shop) = current {
        options.push(ShopOption {
            filter: ShopFilter::Shop(shop.id),
            label: format!("Only this shop ({})", shop.name),
        });
    }

    options.push(ShopOption {
        filter: ShopFilter::All,
        label: "All shops (overview)".to_string(),
    });

    let current_id = current.map(|s| s.id);
    options.extend(
        shops
            .iter()
            .filter(|s| Some(s.id) != current_id)
            .map(|s| ShopOption {
                filter: ShopFilter::Shop(s.id),
                label: s.name.clone(),
            }),
    );

    options
}
