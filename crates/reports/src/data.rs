//! Fetched report data: one row sequence per backend collection.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use posreports_inventory::WastageRecord;
use posreports_products::{Product, ProductCatalog};
use posreports_sales::Sale;

/// Record collections a report generation cycle reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Sales,
    Wastage,
    Returns,
    Butchering,
    StockIn,
    AuditLog,
    Products,
}

impl Collection {
    /// Collections fetched together in the fan-out. Products are fetched by a
    /// separate query.
    pub const FAN_OUT: [Collection; 6] = [
        Collection::Sales,
        Collection::Wastage,
        Collection::Returns,
        Collection::Butchering,
        Collection::StockIn,
        Collection::AuditLog,
    ];

    /// Backend table backing this collection.
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Sales => "sales",
            Collection::Wastage => "wastage_history",
            Collection::Returns => "return_history",
            Collection::Butchering => "butchering_history",
            Collection::StockIn => "stock_in_history",
            Collection::AuditLog => "audit_log",
            Collection::Products => "products",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Snapshot of every collection fetched for one report invocation.
///
/// Missing collections read as empty. Rows stay as raw JSON until a report
/// asks for a typed view, so collections no report decodes cost nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportData {
    collections: HashMap<Collection, Vec<JsonValue>>,
}

impl ReportData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collection: Collection, rows: Vec<JsonValue>) {
        self.collections.insert(collection, rows);
    }

    /// Builder-style insert of typed records (tests, in-memory sources).
    pub fn with_records<T: Serialize>(mut self, collection: Collection, records: &[T]) -> Self {
        let rows = records
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect();
        self.insert(collection, rows);
        self
    }

    pub fn rows(&self, collection: Collection) -> &[JsonValue] {
        self.collections
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.rows(collection).is_empty()
    }

    /// Decode a collection, skipping rows that do not match `T`.
    pub fn decode<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let rows = self.rows(collection);
        let mut out = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            match T::deserialize(row) {
                Ok(record) => out.push(record),
                Err(e) => {
                    tracing::warn!(collection = %collection, row = idx, error = %e, "skipping undecodable row");
                }
            }
        }
        out
    }

    pub fn sales(&self) -> Vec<Sale> {
        self.decode(Collection::Sales)
    }

    pub fn wastage(&self) -> Vec<WastageRecord> {
        self.decode(Collection::Wastage)
    }

    pub fn products(&self) -> ProductCatalog {
        ProductCatalog::new(self.decode::<Product>(Collection::Products))
    }
}
