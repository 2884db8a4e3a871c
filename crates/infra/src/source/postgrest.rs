use reqwest::Url;
use serde_json::Value as JsonValue;

use posreports_products::Shop;
use posreports_reports::{Collection, ShopFilter};

use super::{ReportSource, SourceError};
use crate::config::BackendConfig;

/// Table listing the shops offered in the filter control.
pub const SHOPS_TABLE: &str = "shops";

/// Report source backed by a hosted PostgREST interface (`/rest/v1`).
///
/// Every query is `GET {base}/rest/v1/{table}?select=*`, with
/// `shop_id=eq.{id}` appended when a single shop is selected.
#[derive(Debug, Clone)]
pub struct PostgrestSource {
    client: reqwest::Client,
    config: BackendConfig,
}

impl PostgrestSource {
    pub fn new(config: BackendConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Request {
                table: "*",
                reason: format!("HTTP client error: {e}"),
            })?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, SourceError> {
        Self::new(BackendConfig::from_env()?)
    }

    /// Query URL for `table` under `filter`.
    pub fn table_url(&self, table: &'static str, filter: ShopFilter) -> Result<Url, SourceError> {
        let mut url = Url::parse(&format!("{}/rest/v1/{table}", self.config.base_url)).map_err(|e| {
            SourceError::Request {
                table,
                reason: format!("invalid backend URL: {e}"),
            }
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some(shop_id) = filter.shop_id() {
                query.append_pair("shop_id", &format!("eq.{shop_id}"));
            }
        }
        Ok(url)
    }

    async fn get_rows(&self, table: &'static str, filter: ShopFilter) -> Result<Vec<JsonValue>, SourceError> {
        let url = self.table_url(table, filter)?;
        tracing::debug!(table, %filter, "querying backend");

        let resp = self
            .client
            .get(url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Request {
                table,
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status { table, status, body });
        }

        resp.json::<Vec<JsonValue>>()
            .await
            .map_err(|e| SourceError::Decode {
                table,
                reason: e.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl ReportSource for PostgrestSource {
    async fn fetch_collection(
        &self,
        collection: Collection,
        filter: ShopFilter,
    ) -> Result<Vec<JsonValue>, SourceError> {
        self.get_rows(collection.table_name(), filter).await
    }

    async fn fetch_shops(&self) -> Result<Vec<Shop>, SourceError> {
        let rows = self.get_rows(SHOPS_TABLE, ShopFilter::All).await?;
        let mut shops = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<Shop>(row) {
                Ok(shop) => shops.push(shop),
                Err(e) => tracing::warn!(error = %e, "skipping undecodable shop row"),
            }
        }
        Ok(shops)
    }
}
