//! Concurrent fetch of every collection one report cycle reads.

use futures::future::join_all;

use posreports_core::dedup_first;
use posreports_products::Shop;
use posreports_reports::{Collection, ReportData, ShopFilter};

use crate::source::ReportSource;

/// Fetch the fan-out collections and products under `filter`.
///
/// Queries run concurrently and are joined before returning. A failed query
/// is logged and its collection reads as empty; this never fails as a whole.
pub async fn fetch_report_data<S>(source: &S, filter: ShopFilter) -> ReportData
where
    S: ReportSource + ?Sized,
{
    let queries = Collection::FAN_OUT
        .into_iter()
        .chain(std::iter::once(Collection::Products))
        .map(|collection| async move {
            let rows = match source.fetch_collection(collection, filter).await {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::error!(collection = %collection, %filter, error = %e, "collection fetch failed");
                    Vec::new()
                }
            };
            (collection, rows)
        });

    let mut data = ReportData::new();
    for (collection, rows) in join_all(queries).await {
        data.insert(collection, rows);
    }
    data
}

/// Every shop for the filter control, one entry per id. Failure is logged
/// and yields none.
pub async fn fetch_shops<S>(source: &S) -> Vec<Shop>
where
    S: ReportSource + ?Sized,
{
    match source.fetch_shops().await {
        Ok(shops) => dedup_first(shops).0,
        Err(e) => {
            tracing::error!(error = %e, "shop list fetch failed");
            Vec::new()
        }
    }
}
