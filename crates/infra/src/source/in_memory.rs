use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value as JsonValue;

use posreports_products::Shop;
use posreports_reports::{Collection, ShopFilter};

use super::{ReportSource, SourceError};

#[derive(Debug, Default)]
struct State {
    rows: HashMap<Collection, Vec<JsonValue>>,
    shops: Vec<Shop>,
    failing: HashSet<Collection>,
    shops_failing: bool,
    delays: HashMap<ShopFilter, Duration>,
}

/// In-memory report source.
///
/// Intended for tests/dev. Rows are filtered by their `shop_id` field the way
/// the backend would. Failures and per-filter latency can be injected.
#[derive(Debug, Default)]
pub struct InMemoryReportSource {
    state: RwLock<State>,
    fetches: AtomicUsize,
}

impl InMemoryReportSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, collection: Collection, rows: Vec<JsonValue>) -> Self {
        self.insert_rows(collection, rows);
        self
    }

    /// Builder-style insert of typed records.
    pub fn with_records<T: Serialize>(self, collection: Collection, records: &[T]) -> Self {
        let rows = records
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect();
        self.with_rows(collection, rows)
    }

    pub fn with_shops(self, shops: Vec<Shop>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.shops = shops;
        }
        self
    }

    /// Make every query for `collection` fail.
    pub fn failing(self, collection: Collection) -> Self {
        self.set_failing(collection, true);
        self
    }

    pub fn failing_shops(self) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.shops_failing = true;
        }
        self
    }

    /// Delay every query issued under `filter`.
    pub fn with_delay(self, filter: ShopFilter, delay: Duration) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.delays.insert(filter, delay);
        }
        self
    }

    /// Replace the rows of `collection`.
    pub fn insert_rows(&self, collection: Collection, rows: Vec<JsonValue>) {
        if let Ok(mut state) = self.state.write() {
            state.rows.insert(collection, rows);
        }
    }

    pub fn set_failing(&self, collection: Collection, failing: bool) {
        if let Ok(mut state) = self.state.write() {
            if failing {
                state.failing.insert(collection);
            } else {
                state.failing.remove(&collection);
            }
        }
    }

    /// Number of collection queries answered so far (failed ones included).
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn matches(row: &JsonValue, filter: ShopFilter) -> bool {
        match filter.shop_id() {
            None => true,
            Some(id) => row.get("shop_id").and_then(JsonValue::as_i64) == Some(id.get()),
        }
    }
}

#[async_trait::async_trait]
impl ReportSource for InMemoryReportSource {
    async fn fetch_collection(
        &self,
        collection: Collection,
        filter: ShopFilter,
    ) -> Result<Vec<JsonValue>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        // Never hold the lock across the sleep.
        let delay = self
            .state
            .read()
            .map_err(|_| SourceError::Unavailable(collection.table_name()))?
            .delays
            .get(&filter)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self
            .state
            .read()
            .map_err(|_| SourceError::Unavailable(collection.table_name()))?;
        if state.failing.contains(&collection) {
            return Err(SourceError::Unavailable(collection.table_name()));
        }

        Ok(state
            .rows
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| Self::matches(row, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_shops(&self) -> Result<Vec<Shop>, SourceError> {
        let state = self
            .state
            .read()
            .map_err(|_| SourceError::Unavailable("shops"))?;
        if state.shops_failing {
            return Err(SourceError::Unavailable("shops"));
        }
        Ok(state.shops.clone())
    }
}
