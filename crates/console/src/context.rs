use posreports_auth::Role;
use posreports_products::Shop;
use posreports_reports::{ShopFilter, ShopOption, shop_options};

/// Who is looking at the reports, and from which shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopContext {
    /// Shop the operator is signed in at, when known.
    pub current_shop: Option<Shop>,
    pub role: Role,
}

impl ShopContext {
    pub fn new(role: Role, current_shop: Option<Shop>) -> Self {
        Self { current_shop, role }
    }

    pub fn can_choose_shop(&self) -> bool {
        self.role.can_choose_shop()
    }

    /// Filter a fresh session starts with: the operator's own shop, or the
    /// overview when no shop is known.
    pub fn default_filter(&self) -> ShopFilter {
        self.current_shop
            .as_ref()
            .map_or(ShopFilter::All, |shop| ShopFilter::Shop(shop.id))
    }

    /// Filter options for the shop control. Roles that cannot choose get none.
    pub fn options(&self, shops: &[Shop]) -> Vec<ShopOption> {
        if !self.can_choose_shop() {
            return Vec::new();
        }
        shop_options(self.current_shop.as_ref(), shops)
    }
}
