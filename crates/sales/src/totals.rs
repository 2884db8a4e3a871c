use rust_decimal::Decimal;

use crate::sale::{Sale, SaleDirection};

/// Running revenue / profit / return sums over a set of sales.
///
/// - `revenue` and `profit` only see forward sales (quantity > 0)
/// - `returns` only sees return rows (quantity < 0), as absolute revenue
/// - zero-quantity rows are ignored
///
/// Sums clamp at the `Decimal` bounds rather than overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleTotals {
    pub revenue: Decimal,
    pub profit: Decimal,
    pub returns: Decimal,
    pub forward_count: usize,
    pub return_count: usize,
}

impl SaleTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sale: &Sale) {
        match sale.direction() {
            SaleDirection::Forward => {
                self.revenue = self.revenue.saturating_add(sale.revenue());
                self.profit = self.profit.saturating_add(sale.profit());
                self.forward_count += 1;
            }
            SaleDirection::Return => {
                self.returns = self.returns.saturating_add(sale.return_amount());
                self.return_count += 1;
            }
            SaleDirection::Neutral => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.forward_count == 0 && self.return_count == 0
    }
}

impl<'a> FromIterator<&'a Sale> for SaleTotals {
    fn from_iter<I: IntoIterator<Item = &'a Sale>>(iter: I) -> Self {
        let mut totals = Self::new();
        for sale in iter {
            totals.add(sale);
        }
        totals
    }
}
