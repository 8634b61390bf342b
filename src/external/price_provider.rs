use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DateRange, PricePoint};

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned status {0}")]
    BadStatus(u16),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("symbol cannot be sent upstream: '{0}'")]
    InvalidSymbol(String),

    #[error("upstream auth token not configured")]
    NotConfigured,
}

/// Upstream market data source. Every call is a single attempt; callers
/// decide whether a failure aborts the request or degrades to no data.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Whether the provider has the credential it needs to make calls.
    fn is_configured(&self) -> bool;

    /// Raw company-info body for `symbol`. Only used as an existence check.
    async fn fetch_company_info(&self, symbol: &str) -> Result<String, PriceProviderError>;

    /// Daily prices for `symbol` within `range`, ascending by date.
    async fn fetch_historical_prices(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Vec<PricePoint>, PriceProviderError>;
}
