use tracing::{info, warn};

use crate::external::price_provider::PriceProvider;
use crate::models::{DateRange, HistoricalSeries};

/// Fetches the series for `symbol`. Any upstream failure degrades to an
/// empty series; the caller finds out when it tries to compute on it.
pub async fn retrieve_history(
    provider: &dyn PriceProvider,
    symbol: &str,
    range: &DateRange,
) -> HistoricalSeries {
    match provider.fetch_historical_prices(symbol, range).await {
        Ok(points) => {
            let series = HistoricalSeries::new(symbol, points);
            info!(symbol, points = series.len(), "Retrieved price history");
            series
        }
        Err(e) => {
            warn!(symbol, error = %e, "Price history unavailable, continuing with no data");
            HistoricalSeries::empty(symbol)
        }
    }
}

/// Fetches both series concurrently and waits for both.
pub async fn retrieve_pair(
    provider: &dyn PriceProvider,
    stock: &str,
    benchmark: &str,
    range: &DateRange,
) -> (HistoricalSeries, HistoricalSeries) {
    tokio::join!(
        retrieve_history(provider, stock, range),
        retrieve_history(provider, benchmark, range),
    )
}
