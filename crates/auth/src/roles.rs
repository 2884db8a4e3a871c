use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role names that grant the cross-shop view.
///
/// The Turkish spelling predates the English one and is still issued by the
/// backend for older accounts.
pub const MANAGER_ROLE_NAMES: &[&str] = &["manager", "yönetici"];

/// Role identifier of the signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const MANAGER: Role = Role(Cow::Borrowed("manager"));
    pub const CASHIER: Role = Role(Cow::Borrowed("cashier"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_manager(&self) -> bool {
        MANAGER_ROLE_NAMES.contains(&self.as_str())
    }

    /// Managers may switch the report shop filter; everyone else is pinned
    /// to their own shop.
    pub fn can_choose_shop(&self) -> bool {
        self.is_manager()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
