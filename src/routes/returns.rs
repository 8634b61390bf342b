use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::{price_service, returns_service, validation_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getreturn", get(get_return))
        .route("/getalpha", get(get_alpha))
}

/// Query parameters for GET /api/getreturn
#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    #[serde(rename = "StockSymbol", alias = "stockSymbol", alias = "stocksymbol")]
    pub stock_symbol: String,
    #[serde(rename = "FromDate", alias = "fromDate", alias = "fromdate", default)]
    pub from_date: Option<String>,
    #[serde(rename = "ToDate", alias = "toDate", alias = "todate", default)]
    pub to_date: Option<String>,
}

/// Query parameters for GET /api/getalpha
#[derive(Debug, Deserialize)]
pub struct AlphaQuery {
    #[serde(rename = "StockSymbol", alias = "stockSymbol", alias = "stocksymbol")]
    pub stock_symbol: String,
    #[serde(rename = "BenchmarkStockSymbol", alias = "benchmarkStockSymbol", alias = "benchmarkstocksymbol")]
    pub benchmark_stock_symbol: String,
    #[serde(rename = "FromDate", alias = "fromDate", alias = "fromdate", default)]
    pub from_date: Option<String>,
    #[serde(rename = "ToDate", alias = "toDate", alias = "todate", default)]
    pub to_date: Option<String>,
}

/// GET /api/getreturn
/// Daily `close - open` deltas for one symbol, ascending by date.
pub async fn get_return(
    State(state): State<AppState>,
    Query(query): Query<ReturnQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let span = info_span!("getreturn", request_id = %Uuid::new_v4(), symbol = %query.stock_symbol);

    async move {
        info!("GET /api/getreturn");
        let provider = state.price_provider.as_ref();

        validation_service::validate_auth_configured(provider)?;
        let range = validation_service::parse_and_normalize_dates(
            query.from_date.as_deref(),
            query.to_date.as_deref(),
        )?;
        let symbol = validation_service::require_symbol("StockSymbol", &query.stock_symbol)?;
        validation_service::validate_symbol_exists(provider, symbol).await?;

        let series = price_service::retrieve_history(provider, symbol, &range).await;
        let deltas = returns_service::render_daily_deltas(&series);

        info!(days = deltas.len(), "Returning daily deltas");
        Ok::<_, AppError>(Json(deltas))
    }
    .instrument(span)
    .await
}

/// GET /api/getalpha
/// `(stock return - benchmark return) * 100` over the range, e.g. `"5.00%"`.
pub async fn get_alpha(
    State(state): State<AppState>,
    Query(query): Query<AlphaQuery>,
) -> Result<Json<String>, AppError> {
    let span = info_span!(
        "getalpha",
        request_id = %Uuid::new_v4(),
        symbol = %query.stock_symbol,
        benchmark = %query.benchmark_stock_symbol,
    );

    async move {
        info!("GET /api/getalpha");
        let provider = state.price_provider.as_ref();

        validation_service::validate_auth_configured(provider)?;
        let range = validation_service::parse_and_normalize_dates(
            query.from_date.as_deref(),
            query.to_date.as_deref(),
        )?;
        let symbol = validation_service::require_symbol("StockSymbol", &query.stock_symbol)?;
        let benchmark =
            validation_service::require_symbol("BenchmarkStockSymbol", &query.benchmark_stock_symbol)?;
        validation_service::validate_symbol_pair(provider, symbol, benchmark).await?;

        let (stock_series, benchmark_series) =
            price_service::retrieve_pair(provider, symbol, benchmark, &range).await;

        let stock_return = returns_service::compute_period_return(&stock_series);
        let benchmark_return = returns_service::compute_period_return(&benchmark_series);

        let alpha = returns_service::compute_alpha(stock_return.as_ref(), benchmark_return.as_ref())
            .ok_or_else(|| {
                error!(
                    stock_points = stock_series.len(),
                    benchmark_points = benchmark_series.len(),
                    "Alpha undefined, a period return could not be computed"
                );
                AppError::ComputationUndefined(format!(
                    "no usable price history for {} or {}",
                    symbol, benchmark
                ))
            })?;

        info!(%alpha, "Returning alpha");
        Ok::<_, AppError>(Json(alpha.to_string()))
    }
    .instrument(span)
    .await
}
