use std::collections::HashMap;

use posreports_core::{ProductId, dedup_first};

use crate::product::Product;

/// Id-indexed view over a fetched product set.
///
/// Iteration follows fetch order. When the backend returns the same id twice,
/// the first row wins.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl ProductCatalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        let (products, index) = dedup_first(products);
        Self { products, index }
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).map(|&i| &self.products[i])
    }

    /// Product name, or a placeholder naming the id of a product that no
    /// longer exists in the fetched set.
    pub fn display_name(&self, id: ProductId) -> String {
        match self.get(id) {
            Some(product) => product.name.clone(),
            None => deleted_product_label(id),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Label for a product referenced by sales but missing from the catalog.
pub fn deleted_product_label(id: ProductId) -> String {
    format!("Deleted product (ID: {id})")
}
