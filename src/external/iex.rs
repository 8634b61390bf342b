use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use tracing::debug;
use url::Url;

use crate::config::{ApiToken, UpstreamConfig};
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{DateRange, PricePoint};

/// IEX Cloud core data client.
pub struct IexProvider {
    client: reqwest::Client,
    base_url: Url,
    token: Option<ApiToken>,
}

impl IexProvider {
    pub fn new(config: &UpstreamConfig) -> Result<Self, PriceProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    fn token(&self) -> Result<&ApiToken, PriceProviderError> {
        self.token.as_ref().ok_or(PriceProviderError::NotConfigured)
    }

    /// `{base}/{dataset}/{symbol}?token=...`, with the symbol percent-encoded as one path segment.
    fn endpoint(&self, dataset: &str, symbol: &str, token: &ApiToken) -> Result<Url, PriceProviderError> {
        if symbol.is_empty() || symbol == "." || symbol == ".." {
            return Err(PriceProviderError::InvalidSymbol(symbol.to_string()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PriceProviderError::Network("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .push(dataset)
            .push(symbol);
        url.query_pairs_mut().append_pair("token", token.as_str());
        Ok(url)
    }

    async fn get_body(&self, url: Url) -> Result<String, PriceProviderError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PriceProviderError::BadStatus(status.as_u16()));
        }

        resp.text()
            .await
            .map_err(|e| PriceProviderError::Network(e.without_url().to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct IexHistoricalPrice {
    #[serde(deserialize_with = "deserialize_date")]
    date: NaiveDate,
    #[serde(deserialize_with = "deserialize_decimal")]
    open: BigDecimal,
    #[serde(deserialize_with = "deserialize_decimal")]
    close: BigDecimal,
}

impl From<IexHistoricalPrice> for PricePoint {
    fn from(row: IexHistoricalPrice) -> Self {
        PricePoint::new(row.date, row.open, row.close)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    EpochMillis(i64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(serde_json::Number),
    Text(String),
}

// IEX sends either "2023-01-03" or epoch milliseconds depending on the dataset.
fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    match RawDate::deserialize(deserializer)? {
        RawDate::Text(text) => {
            let date_part = text.split(['T', ' ']).next().unwrap_or_default();
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
        }
        RawDate::EpochMillis(ms) => DateTime::from_timestamp_millis(ms)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {ms}"))),
    }
}

// Goes through the shortest decimal text of the number so 130.28 stays 130.28.
fn deserialize_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
    let text = match RawDecimal::deserialize(deserializer)? {
        RawDecimal::Number(n) => n.to_string(),
        RawDecimal::Text(s) => s,
    };
    BigDecimal::from_str(text.trim()).map_err(serde::de::Error::custom)
}

fn parse_historical_prices(body: &str) -> Result<Vec<PricePoint>, PriceProviderError> {
    let rows: Vec<IexHistoricalPrice> =
        serde_json::from_str(body).map_err(|e| PriceProviderError::Parse(e.to_string()))?;

    let mut points: Vec<PricePoint> = rows.into_iter().map(PricePoint::from).collect();
    points.sort_by_key(|p| p.date);
    Ok(points)
}

#[async_trait]
impl PriceProvider for IexProvider {
    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch_company_info(&self, symbol: &str) -> Result<String, PriceProviderError> {
        let url = self.endpoint("COMPANY", symbol, self.token()?)?;
        debug!(symbol, "Probing IEX company info");
        self.get_body(url).await
    }

    async fn fetch_historical_prices(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        let mut url = self.endpoint("HISTORICAL_PRICES", symbol, self.token()?)?;
        url.query_pairs_mut()
            .append_pair("from", &range.from_param())
            .append_pair("to", &range.to_param());

        debug!(symbol, from = %range.from_param(), to = %range.to_param(), "Fetching IEX historical prices");
        let body = self.get_body(url).await?;
        parse_historical_prices(&body)
    }
}
