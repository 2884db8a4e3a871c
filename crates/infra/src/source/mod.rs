//! Remote data source boundary.
//!
//! A `ReportSource` answers one query per backend collection. It makes no
//! storage assumptions: the in-memory adapter serves tests and demos, the
//! PostgREST adapter talks to the hosted backend.

pub mod in_memory;
pub mod postgrest;

use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

use posreports_products::Shop;
use posreports_reports::{Collection, ShopFilter};

use crate::config::ConfigError;

pub use in_memory::InMemoryReportSource;
pub use postgrest::PostgrestSource;

/// Backend access error.
///
/// These are transport failures, not report failures: the fetcher logs them
/// and degrades the affected collection to empty.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("request to {table} failed: {reason}")]
    Request { table: &'static str, reason: String },

    #[error("{table} responded with status {status}: {body}")]
    Status {
        table: &'static str,
        status: u16,
        body: String,
    },

    #[error("could not decode {table} response: {reason}")]
    Decode { table: &'static str, reason: String },

    #[error("{0} is unavailable")]
    Unavailable(&'static str),
}

/// Read-only query interface over the backend collections.
#[async_trait::async_trait]
pub trait ReportSource: Send + Sync {
    /// All rows of `collection`, restricted to one shop unless the filter is
    /// `All`.
    async fn fetch_collection(
        &self,
        collection: Collection,
        filter: ShopFilter,
    ) -> Result<Vec<JsonValue>, SourceError>;

    /// Every shop, in backend order.
    async fn fetch_shops(&self) -> Result<Vec<Shop>, SourceError>;
}

#[async_trait::async_trait]
impl<S> ReportSource for Arc<S>
where
    S: ReportSource + ?Sized,
{
    async fn fetch_collection(
        &self,
        collection: Collection,
        filter: ShopFilter,
    ) -> Result<Vec<JsonValue>, SourceError> {
        (**self).fetch_collection(collection, filter).await
    }

    async fn fetch_shops(&self) -> Result<Vec<Shop>, SourceError> {
        (**self).fetch_shops().await
    }
}
