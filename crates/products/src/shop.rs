use serde::{Deserialize, Serialize};

use posreports_core::{Entity, ShopId};

/// A shop (store). Only used as a filter dimension, never aggregated over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    #[serde(default, deserialize_with = "posreports_core::de::null_as_default")]
    pub name: String,
}

impl Shop {
    pub fn new(id: ShopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Entity for Shop {
    type Id = ShopId;

    fn id(&self) -> ShopId {
        self.id
    }
}
